//! Error types for gridcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gridcalc-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed cell address text
    #[error("Invalid cell position: {0}")]
    PositionSyntax(String),
}

impl Error {
    pub(crate) fn position<S: Into<String>>(msg: S) -> Self {
        Error::PositionSyntax(msg.into())
    }
}
