//! Repository for the `accounts` table.

use async_trait::async_trait;
use intake_core::onboarding_wizard::ContactFields;
use intake_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::account::Account;
use crate::repositories::client_repo::ensure_matched;
use crate::transaction::StorageOperation;

/// Column list for the `accounts` table.
const COLUMNS: &str = "id, first_name, last_name, username, created_at, updated_at";

pub struct AccountRepo;

impl AccountRepo {
    /// Find an account by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the account managing a client.
    pub async fn find_manager_of(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts \
             WHERE id = (SELECT manager_id FROM clients WHERE id = $1)"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }
}

/// Account half of the `contact` step.
///
/// The account is resolved from `clients.manager_id` inside the same
/// transaction, never taken from the request.
pub struct UpdateManagerIdentity<'a> {
    pub client_id: DbId,
    pub fields: &'a ContactFields,
}

#[async_trait]
impl StorageOperation for UpdateManagerIdentity<'_> {
    fn name(&self) -> &'static str {
        "update_manager_identity"
    }

    async fn execute(&self, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        let result = sqlx::query(
            "UPDATE accounts SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                username = COALESCE($4, username) \
             WHERE id = (SELECT manager_id FROM clients WHERE id = $1)",
        )
        .bind(self.client_id)
        .bind(&self.fields.first_name)
        .bind(&self.fields.last_name)
        .bind(&self.fields.username)
        .execute(conn)
        .await?;
        ensure_matched(result.rows_affected())
    }
}
