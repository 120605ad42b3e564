//! Module providing Token struct for lexing

/// Represents Tokens in GPR
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub enum Token {
    Identifier(String),
    And,
    Or,
    /// Recognized only so the parser can reject it with a useful message
    Not,
    LeftParen,
    RightParen,
    Eof,
}

/// A token together with the character offset where it starts in the rule text
#[derive(Debug, PartialEq, Clone)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}
