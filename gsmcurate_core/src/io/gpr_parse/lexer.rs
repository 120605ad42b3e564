//! Lex a GPR string into a series of tokens for later parsing

use thiserror::Error;

use crate::io::gpr_parse::token::{Spanned, Token};

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Spanned>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Convert the source into tokens, terminated by [`Token::Eof`]
    pub fn lex(mut self) -> Result<Vec<Spanned>, LexerError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.start = self.current;
        self.add_token(Token::Eof);
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), LexerError> {
        let c: char = self.advance();
        match c {
            // Single Character Tokens
            '(' => self.add_token(Token::LeftParen),
            ')' => self.add_token(Token::RightParen),
            // Identifiers and Operators
            c if Lexer::is_identifier_start(c) => self.read_identifier(),
            // Whitespace
            ' ' | '\r' | '\n' | '\t' => {}
            character => {
                return Err(LexerError::InvalidCharacter {
                    character,
                    position: self.start,
                })
            }
        };
        Ok(())
    }

    fn advance(&mut self) -> char {
        let char_at_current = self.source[self.current];
        self.current += 1;
        char_at_current
    }

    fn read_identifier(&mut self) {
        while Lexer::is_identifier_char(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        match text.as_str() {
            "and" | "And" | "AND" => self.add_token(Token::And),
            "or" | "Or" | "OR" => self.add_token(Token::Or),
            "not" | "Not" | "NOT" => self.add_token(Token::Not),
            _ => self.add_token(Token::Identifier(text)),
        }
    }

    fn is_identifier_start(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    /// Locus tags and versioned gene ids may carry `.`, `-` or `:`
    fn is_identifier_char(c: char) -> bool {
        Lexer::is_identifier_start(c) || matches!(c, '.' | '-' | ':')
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(Spanned {
            token,
            position: self.start,
        });
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LexerError {
    #[error("Invalid character `{character}` at position {position}")]
    InvalidCharacter { character: char, position: usize },
}
