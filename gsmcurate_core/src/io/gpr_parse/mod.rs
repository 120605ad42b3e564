//! Module for parsing Gene Protein Reaction strings into AST values

use crate::io::gpr_parse::lexer::LexerError;
use crate::io::gpr_parse::parser::ParseError;
use crate::io::gpr_parse::token::{Spanned, Token};
use crate::metabolic_model::gene::Gpr;
use thiserror::Error;

mod lexer;
pub mod parser;
mod token;

pub use lexer::LexerError as GprLexerError;

/// Parse a Gene Protein Reaction string into a GPR Tree
///
/// # Parameters
/// - `input`: &str representing the gene protein reaction rule
///
/// # Returns
/// Parse result which is
/// - `Ok`: The root node of the GPR tree, or `None` when the rule is blank
///     (the reaction has no gene association).
/// - `Err`: Returns the GprParseError describing the issue with the GPR rule which
///     was being parsed.
///
/// # Examples
/// ```rust
/// use gsmcurate_core::io::gpr_parse::parse_gpr;
/// let gpr = parse_gpr("YALI0B02728g or (YALI0D09229g and YALI0D09229g)").unwrap();
/// assert!(gpr.is_some());
/// assert!(parse_gpr("  ").unwrap().is_none());
/// ```
pub fn parse_gpr(input: &str) -> Result<Option<Gpr>, GprParseError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    // Convert the GPR string into tokens
    let tokens = lexer::Lexer::new(input).lex()?;
    // Now parse those tokens into a GPR tree
    let mut parser = parser::GPRParser::new(tokens);
    Ok(Some(parser.parse()?))
}

/// Whether `text` lexes as exactly one gene id, with no operators, parentheses
/// or surrounding whitespace
pub fn is_gene_id(text: &str) -> bool {
    if text.trim() != text {
        return false;
    }
    matches!(
        lexer::Lexer::new(text).lex().as_deref(),
        Ok([
            Spanned {
                token: Token::Identifier(_),
                ..
            },
            Spanned {
                token: Token::Eof,
                ..
            }
        ])
    )
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum GprParseError {
    /// Lexing Error
    #[error("Malformed GPR rule: {0}")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Malformed GPR rule: {0}")]
    ParsingError(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use crate::io::gpr_parse::is_gene_id;

    #[test]
    fn single_gene_ids() {
        assert!(is_gene_id("YALI0F26587g"));
        assert!(is_gene_id("Rv0001.1"));
        assert!(!is_gene_id("c or d"));
        assert!(!is_gene_id("and"));
        assert!(!is_gene_id("(c)"));
        assert!(!is_gene_id(" c"));
        assert!(!is_gene_id(""));
        assert!(!is_gene_id("c&d"));
    }

    use crate::io::gpr_parse::parse_gpr;
    use crate::metabolic_model::gene::{Gpr, GprOperatorType};

    #[test]
    fn test_parse_gpr() {
        let gpr = parse_gpr("Rv0001 and (Rv0002 or Rv0003)").unwrap().unwrap();
        match gpr {
            Gpr::Operation(op) => {
                assert_eq!(op.operator, GprOperatorType::And);
                assert_eq!(op.operands[0], Gpr::new_gene_node("Rv0001"));
                match &op.operands[1] {
                    Gpr::Operation(inner) => {
                        assert_eq!(inner.operator, GprOperatorType::Or);
                        assert!(inner.parenthesized);
                        assert_eq!(
                            inner.operands,
                            vec![Gpr::new_gene_node("Rv0002"), Gpr::new_gene_node("Rv0003")]
                        );
                    }
                    Gpr::GeneNode(_) => panic!("Incorrect Parse"),
                }
            }
            Gpr::GeneNode(_) => panic!("Incorrect gpr parse"),
        }
    }

    #[test]
    fn round_trip_text() {
        for rule in [
            "YALI0B02728g",
            "YALI0B02728g or YALI0D09229g",
            "YALI0B02728g or (YALI0D09229g and YALI0E12345g)",
            "(YALI0A00001g or YALI0A00002g) and YALI0A00003g",
            "YALI0A00001g and YALI0A00002g or YALI0A00003g",
        ] {
            let gpr = parse_gpr(rule).unwrap().unwrap();
            assert_eq!(gpr.to_string_id(), rule);
        }
    }

    #[test]
    fn malformed_rules() {
        assert!(parse_gpr("YALI0B02728g; YALI0D09229g").is_err());
        assert!(parse_gpr("YALI0B02728g or").is_err());
        assert!(parse_gpr("not YALI0B02728g").is_err());
        assert!(parse_gpr("((YALI0B02728g)").is_err());
    }
}
