//! Staff account model.

use intake_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: DbId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
