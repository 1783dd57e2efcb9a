//! Execution model error types

use thiserror::Error;

/// Errors reported by the optimal execution model
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// The schedule cannot be computed for the given inputs (`N < 1`,
    /// non-positive horizon, non-positive temporary impact)
    #[error("invalid execution parameters: {message}")]
    InvalidParameters {
        /// Which parameter was rejected and why
        message: String,
    },
}

impl ExecutionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ExecutionError::InvalidParameters {
            message: message.into(),
        }
    }
}
