//! Read-only queries for catalogs and status labels.

use sqlx::PgPool;

use crate::models::catalog::{Product, Service, Status};

pub struct CatalogRepo;

impl CatalogRepo {
    /// All services, ordered by id.
    pub async fn list_services(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "SELECT id, service_name, created_at FROM services ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// All products, ordered by id.
    pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "SELECT id, product_type, created_at FROM products ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// All workflow statuses in display order.
    pub async fn list_statuses(pool: &PgPool) -> Result<Vec<Status>, sqlx::Error> {
        sqlx::query_as::<_, Status>(
            "SELECT id, status_name, sort_order FROM statuses ORDER BY sort_order, id",
        )
        .fetch_all(pool)
        .await
    }
}
