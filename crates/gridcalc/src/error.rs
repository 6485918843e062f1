//! Error types for gridcalc

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by [`Table`](crate::Table) operations
#[derive(Debug, Error)]
pub enum Error {
    /// IO error while reading or writing a stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Saved stream is truncated, mis-delimited or has trailing bytes
    #[error("Stream format error: {0}")]
    StreamFormat(String),

    /// Cell text could not be turned into a formula
    #[error("Formula error: {0}")]
    Formula(#[from] gridcalc_formula::FormulaError),

    /// Malformed cell position
    #[error("Core error: {0}")]
    Core(#[from] gridcalc_core::Error),
}

impl Error {
    pub(crate) fn stream<S: Into<String>>(msg: S) -> Self {
        Error::StreamFormat(msg.into())
    }
}
