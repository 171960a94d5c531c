//! Storage error types and Postgres error classification helpers.

use std::time::Duration;

use intake_core::error::CoreError;

/// Postgres SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Postgres SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Failure of an atomic unit run through [`crate::transaction::run_atomic`].
///
/// In every variant the transaction has been rolled back (or never began),
/// so no partial write is visible.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Failed to begin transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("Operation {index} ({operation}) failed: {source}")]
    Operation {
        index: usize,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),

    #[error("Transaction timed out after {0:?}")]
    TimedOut(Duration),

    /// The unit was refused for a domain reason: an invalid batch before any
    /// write, or an unknown catalog id after rollback.
    #[error(transparent)]
    Rejected(#[from] CoreError),
}

impl TransactionError {
    /// The storage error behind a failed operation, if any.
    pub fn operation_error(&self) -> Option<&sqlx::Error> {
        match self {
            Self::Operation { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Name of the operation that failed, if any.
    pub fn failed_operation(&self) -> Option<&'static str> {
        match self {
            Self::Operation { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

/// SQLSTATE code of a database error, if the error came from Postgres.
pub fn sqlstate(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// `true` for a foreign-key violation (unknown referenced id).
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}

/// `true` for a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

/// Name of the violated constraint, if Postgres reported one.
pub fn constraint_name(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
