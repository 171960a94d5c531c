//! HTTP-level integration tests for attachment uploads.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app_with_storage, post_files, seed_client, RecordingStorage, CLIENT_ID,
};
use intake_core::attachments::AttachmentKind;
use intake_db::repositories::AttachmentRepo;
use sqlx::PgPool;

async fn stored_pictures(pool: &PgPool) -> Vec<String> {
    AttachmentRepo::list(pool, CLIENT_ID, AttachmentKind::Pictures)
        .await
        .unwrap()
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batches_append_in_order(pool: PgPool) {
    seed_client(&pool).await;
    let storage = Arc::new(RecordingStorage::default());

    let first = post_files(
        build_test_app_with_storage(pool.clone(), storage.clone()),
        "/api/v1/clients/42/attachments/pictures",
        &[("u1.png", b"one"), ("u2.png", b"two")],
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["data"]["kind"], "pictures");
    assert_eq!(json["data"]["status"], "accepted");
    assert_eq!(json["data"]["urls"].as_array().unwrap().len(), 2);

    let second = post_files(
        build_test_app_with_storage(pool.clone(), storage.clone()),
        "/api/v1/clients/42/attachments/pictures",
        &[("u3.png", b"three")],
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);

    let pictures = stored_pictures(&pool).await;
    assert_eq!(pictures.len(), 3);
    assert!(pictures[0].ends_with("-u1.png"));
    assert!(pictures[1].ends_with("-u2.png"));
    assert!(pictures[2].ends_with("-u3.png"));
    assert!(pictures[0].starts_with("https://files.example/clients/42/pictures/"));
    assert_eq!(storage.stored_keys().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_upload_appends_nothing(pool: PgPool) {
    seed_client(&pool).await;
    let storage = Arc::new(RecordingStorage::failing_on("u5.png"));

    let response = post_files(
        build_test_app_with_storage(pool.clone(), storage),
        "/api/v1/clients/42/attachments/pictures",
        &[("u4.png", b"four"), ("u5.png", b"five")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert!(stored_pictures(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contract_upload(pool: PgPool) {
    seed_client(&pool).await;
    let storage = Arc::new(RecordingStorage::default());

    let response = post_files(
        build_test_app_with_storage(pool.clone(), storage),
        "/api/v1/clients/42/attachments/contract",
        &[("signed.pdf", b"%PDF")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let contract = AttachmentRepo::list(&pool, CLIENT_ID, AttachmentKind::Contract)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(contract.len(), 1);
    assert!(stored_pictures(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_for_missing_client_stores_nothing(pool: PgPool) {
    let storage = Arc::new(RecordingStorage::default());

    let response = post_files(
        build_test_app_with_storage(pool, storage.clone()),
        "/api/v1/clients/404/attachments/pictures",
        &[("u1.png", b"one")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(storage.stored_keys().is_empty());
}
