//! Repository for the `client_services` and `client_products` join tables.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use intake_core::error::CoreError;
use intake_core::reconcile::{dedupe_ids, diff_selection, SelectionDiff};
use intake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::{is_foreign_key_violation, TransactionError};
use crate::models::selection::SelectionRelation;
use crate::transaction::{run_atomic, StorageOperation};

pub struct SelectionRepo;

impl SelectionRepo {
    /// Catalog ids currently selected by a client, ascending.
    pub async fn list_ids(
        pool: &PgPool,
        relation: SelectionRelation,
        client_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT {col} FROM {table} WHERE client_id = $1 ORDER BY {col}",
            col = relation.catalog_column(),
            table = relation.join_table(),
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Make the stored selection equal `desired`, atomically.
    ///
    /// Returns the diff that was applied. Unknown catalog ids fail with
    /// [`CoreError::Reference`] and leave the previous selection in place.
    pub async fn reconcile(
        pool: &PgPool,
        relation: SelectionRelation,
        client_id: DbId,
        desired: &[DbId],
        timeout: Duration,
    ) -> Result<SelectionDiff, TransactionError> {
        let op = ReconcileSelection::new(relation, client_id, desired);
        run_atomic(pool, &[&op], timeout)
            .await
            .map_err(|e| reject_unknown_ids(e, relation, client_id))?;
        Ok(op.into_applied())
    }
}

/// Turn a foreign-key failure of the rolled-back unit into a reference error.
fn reject_unknown_ids(
    err: TransactionError,
    relation: SelectionRelation,
    client_id: DbId,
) -> TransactionError {
    match err.operation_error() {
        Some(source) if is_foreign_key_violation(source) => {
            tracing::warn!(
                client_id,
                relation = %relation,
                error = %source,
                "Selection references an unknown catalog id"
            );
            CoreError::Reference(format!(
                "{} selection contains an id that does not exist",
                relation.entity()
            ))
            .into()
        }
        _ => err,
    }
}

/// Replace a client's selection with a complete desired set.
///
/// Locks and stamps the client row first, then deletes stale rows and
/// inserts missing ones. Rows present in both sets are left untouched.
pub struct ReconcileSelection {
    relation: SelectionRelation,
    client_id: DbId,
    desired: Vec<DbId>,
    applied: OnceLock<SelectionDiff>,
}

impl ReconcileSelection {
    pub fn new(relation: SelectionRelation, client_id: DbId, desired: &[DbId]) -> Self {
        Self {
            relation,
            client_id,
            desired: dedupe_ids(desired),
            applied: OnceLock::new(),
        }
    }

    /// The diff applied by the last successful execution.
    pub fn into_applied(self) -> SelectionDiff {
        self.applied.into_inner().unwrap_or_default()
    }
}

#[async_trait]
impl StorageOperation for ReconcileSelection {
    fn name(&self) -> &'static str {
        match self.relation {
            SelectionRelation::Services => "reconcile_client_services",
            SelectionRelation::Products => "reconcile_client_products",
        }
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let table = self.relation.join_table();
        let col = self.relation.catalog_column();

        // Row lock serializes concurrent reconciles for the same client.
        sqlx::query_scalar::<_, DbId>(
            "UPDATE clients SET last_active = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(self.client_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

        let current_query = format!("SELECT {col} FROM {table} WHERE client_id = $1");
        let current: Vec<DbId> = sqlx::query_scalar(&current_query)
            .bind(self.client_id)
            .fetch_all(&mut *conn)
            .await?;

        let diff = diff_selection(&self.desired, &current);

        if !diff.to_delete.is_empty() {
            let delete_query =
                format!("DELETE FROM {table} WHERE client_id = $1 AND {col} = ANY($2)");
            sqlx::query(&delete_query)
                .bind(self.client_id)
                .bind(&diff.to_delete)
                .execute(&mut *conn)
                .await?;
        }

        if !diff.to_insert.is_empty() {
            let insert_query = format!(
                "INSERT INTO {table} (client_id, {col}) \
                 SELECT $1, UNNEST($2::bigint[]) \
                 ON CONFLICT DO NOTHING"
            );
            sqlx::query(&insert_query)
                .bind(self.client_id)
                .bind(&diff.to_insert)
                .execute(&mut *conn)
                .await?;
        }

        tracing::debug!(
            client_id = self.client_id,
            relation = %self.relation,
            deleted = diff.to_delete.len(),
            inserted = diff.to_insert.len(),
            "Selection reconciled"
        );
        let _ = self.applied.set(diff);
        Ok(())
    }
}
