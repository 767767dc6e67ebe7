//! Error types.
//!
//! Impossible pairings and empty rounds are not errors (they are
//! infinities and `None`). Errors cover malformed input and lookups the
//! caller got wrong.

use thiserror::Error;

use crate::validation::ValidationError;

/// Crate result type.
pub type Result<T> = std::result::Result<T, AllocError>;

/// Errors raised by the session and registry surfaces.
#[derive(Error, Debug)]
pub enum AllocError {
    /// Input failed validation.
    #[error("invalid input: {} problem(s), first: {}", .0.len(), .0.first().map(|e| e.message.as_str()).unwrap_or(""))]
    InvalidInput(Vec<ValidationError>),

    /// Task index outside the session.
    #[error("task index {0} out of range")]
    UnknownTask(usize),

    /// No strategy registered under the key.
    #[error("no strategy registered as '{0}'")]
    UnknownStrategy(String),
}
