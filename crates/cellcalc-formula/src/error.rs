//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while tokenizing or parsing a formula
///
/// The evaluator never returns these; a formula that fails to parse evaluates to
/// [`CellError::Value`](cellcalc_core::CellError::Value).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulaError {
    /// Character outside the formula alphabet
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// Number literal with more than one decimal point
    #[error("Malformed number: {0}")]
    MalformedNumber(String),

    /// Token that does not fit the grammar at this point
    #[error("Expected {expected}, got {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    /// Input ended in the middle of an expression
    #[error("Unexpected end of formula, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Tokens left over after a complete expression
    #[error("Unexpected input after expression: {0}")]
    TrailingInput(String),

    /// Expression nested deeper than the parser allows
    #[error("Formula nested deeper than {0} levels")]
    TooDeep(usize),
}
