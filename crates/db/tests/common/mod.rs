//! Seed helpers shared by the storage integration tests.
//!
//! Rows are inserted with explicit ids so tests can talk about "client 42"
//! and "service 7" directly.

#![allow(dead_code)]

use sqlx::PgPool;

pub const MANAGER_ID: i64 = 1;
pub const CLIENT_ID: i64 = 42;

pub async fn seed_account(pool: &PgPool, id: i64, username: &str) {
    sqlx::query(
        "INSERT INTO accounts (id, first_name, last_name, username) \
         VALUES ($1, 'Pat', 'Lee', $2) ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(username)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn seed_client(pool: &PgPool, id: i64, manager_id: i64) {
    sqlx::query(
        "INSERT INTO clients (id, manager_id, status_id, business_name, phone) \
         VALUES ($1, $2, 2, 'Corner Office', '555-0100') ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(manager_id)
    .execute(pool)
    .await
    .unwrap();
}

/// Add services with explicit ids on top of the migration seed data.
pub async fn seed_services(pool: &PgPool, ids: &[i64]) {
    for id in ids {
        sqlx::query(
            "INSERT INTO services (id, service_name) VALUES ($1, $2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(format!("Test service {id}"))
        .execute(pool)
        .await
        .unwrap();
    }
}

/// Manager account plus client 42.
pub async fn seed_default_client(pool: &PgPool) {
    seed_account(pool, MANAGER_ID, "pat.lee").await;
    seed_client(pool, CLIENT_ID, MANAGER_ID).await;
}

pub async fn last_active(pool: &PgPool, client_id: i64) -> chrono::DateTime<chrono::Utc> {
    sqlx::query_scalar("SELECT last_active FROM clients WHERE id = $1")
        .bind(client_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Push `last_active` into the past so a later stamp is observable.
pub async fn age_client(pool: &PgPool, client_id: i64) {
    sqlx::query("UPDATE clients SET last_active = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(client_id)
        .execute(pool)
        .await
        .unwrap();
}
