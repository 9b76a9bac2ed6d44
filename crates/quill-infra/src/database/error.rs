//! Mapping from SeaORM errors into repository errors.

use sea_orm::{DbErr, SqlErr};

use quill_core::error::RepoError;

/// Classify a database error.
///
/// Unique and foreign key violations are recognised from the driver's error
/// code; messages are checked as a fallback for drivers that report neither.
pub(crate) fn repo_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => return RepoError::Constraint(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::Reference(msg),
        _ => {}
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("UNIQUE constraint failed") || msg.contains("duplicate key") {
                RepoError::Constraint(msg)
            } else if msg.contains("FOREIGN KEY constraint failed") {
                RepoError::Reference(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}
