//! Error types for the chain timer

use thiserror::Error;

/// Errors produced by the chain controller and its adapters.
///
/// None of these are fatal: index and input errors leave the state
/// untouched, storage errors are logged by the caller and swallowed.
#[derive(Error, Debug)]
pub enum ChainError {
    /// Duration text that is not a non-negative whole number of seconds
    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    /// Index-based operation on a stage that does not exist
    #[error("Index {index} out of range for chain of {len} timers")]
    IndexOutOfRange { index: usize, len: usize },

    /// Key-value store failure
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to lock chain state: {0}")]
    LockPoisoned(String),
}

impl ChainError {
    pub fn invalid_duration(input: &str, reason: impl Into<String>) -> Self {
        ChainError::InvalidDuration {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for ChainError
pub type Result<T, E = ChainError> = std::result::Result<T, E>;
