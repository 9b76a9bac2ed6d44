//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures detected before persistence.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation failed on '{field}': {message}")]
    Validation { field: &'static str, message: String },
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
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

    /// A unique constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("Reference violation: {0}")]
    Reference(String),
}
