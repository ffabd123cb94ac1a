//! Database error types for revu-db.

use revu_core::validation::ValidationErrors;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned. Also returned for rows
    /// that exist but are discarded.
    #[error("No result returned")]
    NoResult,

    /// The record failed validation and was not written.
    #[error("Validation failed: {0:?}")]
    Invalid(ValidationErrors),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ValidationErrors> for DatabaseError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}
