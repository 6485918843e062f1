//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while turning cell text into a formula tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Formula text does not follow the grammar
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Construct the engine does not evaluate (ranges, function calls)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Operator pushed with too few operands on the builder stack
    #[error("Operator '{0}' is missing an operand")]
    StackUnderflow(&'static str),

    /// Builder finished with other than exactly one tree
    #[error("Expected a single expression, found {0}")]
    IncompleteExpression(usize),

    /// Malformed cell reference
    #[error(transparent)]
    Position(#[from] gridcalc_core::Error),
}
