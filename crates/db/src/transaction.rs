//! All-or-nothing execution of storage operations.
//!
//! A multi-table write is described as an ordered list of
//! [`StorageOperation`]s. [`run_atomic`] runs them on one transaction under
//! a timeout: either every operation commits or none of them is visible.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::error::TransactionError;

/// One step of an atomic unit, executed on the transaction's connection.
#[async_trait]
pub trait StorageOperation: Send + Sync {
    /// Short name for logs and error reports.
    fn name(&self) -> &'static str;

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error>;
}

/// Run `operations` in order inside a single transaction.
///
/// The first failing operation aborts the unit and rolls back everything
/// executed before it. If the whole unit (begin, operations and commit) does
/// not finish within `timeout`, the in-flight transaction is dropped, which
/// makes sqlx roll it back before the connection is reused.
pub async fn run_atomic(
    pool: &PgPool,
    operations: &[&dyn StorageOperation],
    timeout: Duration,
) -> Result<(), TransactionError> {
    match tokio::time::timeout(timeout, run_in_transaction(pool, operations)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                timeout_ms = timeout.as_millis() as u64,
                operations = operations.len(),
                "Atomic unit timed out, rolled back"
            );
            Err(TransactionError::TimedOut(timeout))
        }
    }
}

async fn run_in_transaction(
    pool: &PgPool,
    operations: &[&dyn StorageOperation],
) -> Result<(), TransactionError> {
    let mut tx = pool.begin().await.map_err(TransactionError::Begin)?;

    for (index, op) in operations.iter().enumerate() {
        if let Err(source) = op.execute(&mut *tx).await {
            tracing::warn!(
                index,
                operation = op.name(),
                error = %source,
                "Storage operation failed, rolling back"
            );
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback failed");
            }
            return Err(TransactionError::Operation {
                index,
                operation: op.name(),
                source,
            });
        }
    }

    tx.commit().await.map_err(TransactionError::Commit)?;
    tracing::debug!(operations = operations.len(), "Atomic unit committed");
    Ok(())
}
