//! Read-only reference data: service and product catalogs, status labels.

use intake_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Service {
    pub id: DbId,
    pub service_name: String,
    pub created_at: Timestamp,
}

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub product_type: String,
    pub created_at: Timestamp,
}

/// A row from the `statuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Status {
    pub id: StatusId,
    pub status_name: String,
    pub sort_order: i16,
}
