//! Domain-level error types.

use thiserror::Error;

use crate::ports::TextGenerationError;

/// Domain errors - every failure the content pipeline can surface.
///
/// None of these are fatal: callers report them and return to an editable
/// state.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Unauthorized access")]
    Authorization,

    #[error("A request is already in progress")]
    Busy,
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::not_found("row", "unknown"),
            RepoError::Constraint(detail) => DomainError::Persistence(detail),
            RepoError::Connection(detail) | RepoError::Query(detail) => {
                tracing::error!(error = %detail, "Storage operation failed");
                DomainError::Persistence("storage is unavailable".to_string())
            }
        }
    }
}

impl From<TextGenerationError> for DomainError {
    fn from(err: TextGenerationError) -> Self {
        match err {
            TextGenerationError::Timeout(after) => DomainError::Timeout {
                seconds: after.as_secs(),
            },
            other => DomainError::GenerationFailed(other.to_string()),
        }
    }
}
