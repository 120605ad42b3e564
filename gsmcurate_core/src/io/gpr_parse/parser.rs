use crate::io::gpr_parse::token::{Spanned, Token};
use crate::metabolic_model::gene::{Gpr, GprOperatorType};

use thiserror::Error;
/*
GPR Grammar:
expression -> disjunction
disjunction -> conjunction ( "OR" conjunction )* ;
conjunction -> primary ( "AND" primary )* ;
primary -> GENE | "(" expression ")" ;

e.g. (Gene1 AND Gene2) OR Gene3
 */

/// GPR Parser
pub struct GPRParser {
    /// Vector of tokens from the GPR string
    tokens: Vec<Spanned>,
    /// Current token being processed
    current: usize,
}

impl GPRParser {
    /// Create a new GPRParser, `tokens` must end with [`Token::Eof`]
    pub fn new(tokens: Vec<Spanned>) -> GPRParser {
        GPRParser { tokens, current: 0 }
    }

    // region Parsing Functions

    /// Parse the token vector into a GPR AST
    pub fn parse(&mut self) -> Result<Gpr, ParseError> {
        let gpr = self.disjunction()?;
        if !self.is_at_end() {
            // If entire expression has not been parsed, an error has occurred
            return Err(match self.peek() {
                Token::RightParen => ParseError::UnbalancedParenthesis {
                    position: self.position(),
                },
                _ => ParseError::EarlyTermination {
                    position: self.position(),
                },
            });
        }
        Ok(gpr)
    }

    fn disjunction(&mut self) -> Result<Gpr, ParseError> {
        let mut expr = self.conjunction()?;
        while self.match_token(Token::Or) {
            let right = self.conjunction()?;
            expr = Gpr::new_binary_operation(expr, GprOperatorType::Or, right);
        }
        Ok(expr)
    }

    fn conjunction(&mut self) -> Result<Gpr, ParseError> {
        let mut expr = self.primary()?;
        while self.match_token(Token::And) {
            let right = self.primary()?;
            expr = Gpr::new_binary_operation(expr, GprOperatorType::And, right);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Gpr, ParseError> {
        if let Some(identifier) = self.match_identifier() {
            return Ok(Gpr::new_gene_node(&identifier));
        }

        if self.match_token(Token::LeftParen) {
            let open = self.previous_position();
            let mut expr = self.disjunction()?;
            if !self.match_token(Token::RightParen) {
                return Err(ParseError::UnbalancedParenthesis { position: open });
            }
            if let Gpr::Operation(ref mut op) = expr {
                op.parenthesized = true;
            }
            return Ok(expr);
        }

        match self.peek() {
            Token::Not => Err(ParseError::UnsupportedOperator {
                operator: "not".to_string(),
                position: self.position(),
            }),
            _ => Err(ParseError::ExpectedExpression {
                position: self.position(),
            }),
        }
    }

    // endregion Parsing Functions

    // region parsing helper functions

    /// Check whether the token at the current position matches `token`,
    /// if it does advance [`self.current`] and return true, otherwise return false
    fn match_token(&mut self, token: Token) -> bool {
        if self.check(&token) {
            self.advance();
            return true;
        }
        false
    }

    /// Similar to [`match_token`], but for matching an identifier token. If the current
    /// token is an identifier return `Some(GeneId)`, where GeneId is the gene's string identifier,
    /// otherwise return None
    fn match_identifier(&mut self) -> Option<String> {
        if let Token::Identifier(id) = self.peek() {
            let id = id.clone();
            self.advance();
            return Some(id);
        }
        None
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek() == token
    }

    /// Advance `self.current` one position unless at end of GPR Vec
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Check whether the parser is at the end of the source Vec
    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current].token
    }

    fn position(&self) -> usize {
        self.tokens[self.current].position
    }

    fn previous_position(&self) -> usize {
        self.tokens[self.current - 1].position
    }

    // endregion parsing helper functions
}

/// Enum representing possible parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Operator outside of `and`/`or`
    #[error("Unsupported operator `{operator}` at position {position}, only `and` and `or` are allowed")]
    UnsupportedOperator { operator: String, position: usize },
    /// A parenthesis without its partner
    #[error("Unbalanced parenthesis at position {position}")]
    UnbalancedParenthesis { position: usize },
    /// No expression found when one was expected
    #[error("Expected a gene or grouped expression at position {position}")]
    ExpectedExpression { position: usize },
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early at position {position}, check for two genes without an operator between them")]
    EarlyTermination { position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gpr_parse::lexer::Lexer;
    use crate::metabolic_model::gene::GprOperation;

    fn parse(source: &str) -> Result<Gpr, ParseError> {
        let tokens = Lexer::new(source).lex().unwrap();
        GPRParser::new(tokens).parse()
    }

    fn gene(id: &str) -> Gpr {
        Gpr::new_gene_node(id)
    }

    #[test]
    fn single_gene_parse() {
        assert_eq!(parse("YALI0B02728g").unwrap(), gene("YALI0B02728g"));
    }

    #[test]
    fn and_parse() {
        match parse("YALI0B02728g and YALI0D09229g").unwrap() {
            Gpr::Operation(op) => {
                assert_eq!(op.operator, GprOperatorType::And);
                assert_eq!(op.operands, vec![gene("YALI0B02728g"), gene("YALI0D09229g")]);
                assert!(!op.parenthesized);
            }
            Gpr::GeneNode(_) => panic!("Incorrect Parse Result (Should have been an AND operation)"),
        }
    }

    #[test]
    fn repeated_binary_parse() {
        match parse("a or b OR c").unwrap() {
            Gpr::Operation(op) => {
                assert_eq!(op.operator, GprOperatorType::Or);
                assert_eq!(op.operands, vec![gene("a"), gene("b"), gene("c")]);
            }
            Gpr::GeneNode(_) => panic!("Incorrect parse"),
        }
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expected = Gpr::Operation(GprOperation {
            operator: GprOperatorType::Or,
            operands: vec![
                gene("a"),
                Gpr::Operation(GprOperation {
                    operator: GprOperatorType::And,
                    operands: vec![gene("b"), gene("c")],
                    parenthesized: false,
                }),
            ],
            parenthesized: false,
        });
        assert_eq!(parse("a or b and c").unwrap(), expected);
    }

    #[test]
    fn grouping_parse() {
        let expected = Gpr::Operation(GprOperation {
            operator: GprOperatorType::And,
            operands: vec![
                Gpr::Operation(GprOperation {
                    operator: GprOperatorType::Or,
                    operands: vec![gene("a"), gene("b")],
                    parenthesized: true,
                }),
                gene("c"),
            ],
            parenthesized: false,
        });
        assert_eq!(parse("(a or b) and c").unwrap(), expected);
    }

    #[test]
    fn parenthesized_gene_is_plain_gene() {
        assert_eq!(parse("(a)").unwrap(), gene("a"));
    }

    #[test]
    fn not_is_rejected() {
        assert_eq!(
            parse("a and not b").unwrap_err(),
            ParseError::UnsupportedOperator {
                operator: "not".to_string(),
                position: 6
            }
        );
    }

    #[test]
    fn missing_operator() {
        assert_eq!(
            parse("a b").unwrap_err(),
            ParseError::EarlyTermination { position: 2 }
        );
    }

    #[test]
    fn unbalanced_parenthesis() {
        assert_eq!(
            parse("(a or b").unwrap_err(),
            ParseError::UnbalancedParenthesis { position: 0 }
        );
        assert_eq!(
            parse("a or b)").unwrap_err(),
            ParseError::UnbalancedParenthesis { position: 6 }
        );
    }

    #[test]
    fn dangling_operator() {
        assert_eq!(
            parse("a and").unwrap_err(),
            ParseError::ExpectedExpression { position: 5 }
        );
    }
}
