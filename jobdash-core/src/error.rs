//! Job board errors

use thiserror::Error;

/// Errors raised by job board operations
///
/// A failed operation never mutates the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Bad or duplicate input on add
    #[error("{0}")]
    Validation(String),

    /// Retry referenced an unknown job
    #[error("Job {0} not found")]
    NotFound(i64),
}

impl BoardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
