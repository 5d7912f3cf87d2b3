//! Error types for Quorum text helpers

use thiserror::Error;

/// Text helper errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// Caller broke an argument contract (absent input, empty candidates)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for text helpers
pub type TextResult<T> = Result<T, TextError>;
