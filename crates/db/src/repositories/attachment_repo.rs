//! Append-only attachment URL lists on `clients`.

use std::time::Duration;

use async_trait::async_trait;
use intake_core::attachments::{validate_batch_size, AttachmentKind};
use intake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::TransactionError;
use crate::repositories::client_repo::ensure_matched;
use crate::transaction::{run_atomic, StorageOperation};

pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Stored URLs of one kind, in append order. `None` if the client does
    /// not exist.
    pub async fn list(
        pool: &PgPool,
        client_id: DbId,
        kind: AttachmentKind,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let query = format!("SELECT {} FROM clients WHERE id = $1", kind.column());
        sqlx::query_scalar::<_, Vec<String>>(&query)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    /// Append a fully stored batch of URLs to the client's list.
    ///
    /// An empty or oversized batch is rejected with a validation error
    /// before the client row is touched.
    pub async fn append(
        pool: &PgPool,
        client_id: DbId,
        kind: AttachmentKind,
        urls: &[String],
        timeout: Duration,
    ) -> Result<(), TransactionError> {
        validate_batch_size(urls.len())?;

        let op = AppendAttachments {
            client_id,
            kind,
            urls,
        };
        run_atomic(pool, &[&op], timeout).await
    }
}

/// Append URLs to `pictures` or `contract`, keeping existing order.
pub struct AppendAttachments<'a> {
    pub client_id: DbId,
    pub kind: AttachmentKind,
    pub urls: &'a [String],
}

#[async_trait]
impl StorageOperation for AppendAttachments<'_> {
    fn name(&self) -> &'static str {
        match self.kind {
            AttachmentKind::Pictures => "append_client_pictures",
            AttachmentKind::Contract => "append_client_contract",
        }
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let col = self.kind.column();
        let query = format!(
            "UPDATE clients SET {col} = {col} || $2::text[], last_active = NOW() WHERE id = $1"
        );
        let result = sqlx::query(&query)
            .bind(self.client_id)
            .bind(self.urls)
            .execute(conn)
            .await?;
        ensure_matched(result.rows_affected())
    }
}
