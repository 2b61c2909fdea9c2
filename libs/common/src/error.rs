//! Custom error types for the common library
//!
//! This module defines the error types shared by the services: database
//! failures and identity resolution failures.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// No connection could be acquired after every retry was spent
    #[error("Database unavailable after {attempts} attempt(s): {source}")]
    Unavailable {
        attempts: u32,
        #[source]
        source: SqlxError,
    },

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique index rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Error occurred during schema initialisation or backfill
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify an error raised by a statement that has already been issued.
    ///
    /// Unique index rejections are split out so callers can recover from them.
    pub fn from_query(err: SqlxError) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                DatabaseError::UniqueViolation(db.constraint().unwrap_or("unknown").to_string())
            }
            _ => DatabaseError::Query(err),
        }
    }

    /// Whether the failure means the backing store could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DatabaseError::Unavailable { .. })
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Raised when an opaque identifier is neither a native nor a legacy id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Identifier {0:?} is neither a native id nor a legacy integer id")]
pub struct IdentityError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_query_errors() {
        let err = DatabaseError::from_query(SqlxError::RowNotFound);
        assert!(matches!(err, DatabaseError::Query(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_unavailable_is_flagged() {
        let err = DatabaseError::Unavailable {
            attempts: 3,
            source: SqlxError::PoolTimedOut,
        };
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("3 attempt(s)"));
    }
}
