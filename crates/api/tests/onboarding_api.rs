//! HTTP-level integration tests for client detail and wizard steps.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, put_json, seed_client, CLIENT_ID};
use intake_db::repositories::{AccountRepo, ClientRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: GET /api/v1/clients/{id}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_client_detail(pool: PgPool) {
    seed_client(&pool).await;

    let response = get(build_test_app(pool), "/api/v1/clients/42").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["client_id"], 42);
    assert_eq!(json["data"]["business_name"], "Corner Office");
    assert_eq!(json["data"]["status_name"], "Onboarding");
    assert_eq!(json["data"]["username"], "pat.lee");
    assert_eq!(json["data"]["service_ids"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_missing_client_returns_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/clients/404").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Client with id 404 not found");
}

// ---------------------------------------------------------------------------
// Test: PUT /api/v1/clients/{id}/steps/{step}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_location_step_accepted(pool: PgPool) {
    seed_client(&pool).await;

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/location",
        json!({
            "business_name": "Acme Corp",
            "address_zip": "62701",
            "address_city": "Springfield",
            "unexpected": "ignored"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["client_id"], 42);
    assert_eq!(json["data"]["step"], "location");
    assert_eq!(json["data"]["status"], "accepted");

    let client = ClientRepo::find_by_id(&pool, CLIENT_ID).await.unwrap().unwrap();
    assert_eq!(client.business_name.as_deref(), Some("Acme Corp"));
    assert_eq!(client.address_city.as_deref(), Some("Springfield"));
    // Not part of this submission: unchanged.
    assert_eq!(client.phone.as_deref(), Some("555-0100"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_demographics_step_with_legacy_age_group(pool: PgPool) {
    seed_client(&pool).await;

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/demographics",
        json!({ "number_of_people": 85, "age_group": "18-30" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let client = ClientRepo::find_by_id(&pool, CLIENT_ID).await.unwrap().unwrap();
    assert_eq!(client.number_of_people, Some(85));
    assert_eq!(client.target_age_group.as_deref(), Some("18-30"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_service_choice_replaces_selection(pool: PgPool) {
    seed_client(&pool).await;

    let first = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/service_choice",
        json!({ "service_ids": [1, 3] }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/service_choice",
        json!({ "service_ids": [3, 4] }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["data"]["selection"]["to_delete"], json!([1]));
    assert_eq!(json["data"]["selection"]["to_insert"], json!([4]));

    let detail = get(build_test_app(pool), "/api/v1/clients/42").await;
    let json = body_json(detail).await;
    assert_eq!(json["data"]["service_ids"], json!([3, 4]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_service_id_returns_422_and_keeps_selection(pool: PgPool) {
    seed_client(&pool).await;
    put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/service_choice",
        json!({ "service_ids": [2] }),
    )
    .await;

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/service_choice",
        json!({ "service_ids": [999] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REFERENCE_ERROR");
    assert_eq!(
        json["error"],
        "Service selection contains an id that does not exist"
    );

    let detail = body_json(get(build_test_app(pool), "/api/v1/clients/42").await).await;
    assert_eq!(detail["data"]["service_ids"], json!([2]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_choice_step(pool: PgPool) {
    seed_client(&pool).await;

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/product_choice",
        json!({ "product_ids": [5, 1] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = body_json(get(build_test_app(pool), "/api/v1/clients/42").await).await;
    assert_eq!(detail["data"]["product_ids"], json!([1, 5]));
    assert_eq!(detail["data"]["product_types"], json!(["Snacks", "Frozen Meals"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_step_updates_manager(pool: PgPool) {
    seed_client(&pool).await;

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/contact",
        json!({
            "phone": "+1 (555) 010-9999",
            "first_name": "Robin",
            "username": "robin.d",
            "user_id": 7
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let client = ClientRepo::find_by_id(&pool, CLIENT_ID).await.unwrap().unwrap();
    assert_eq!(client.phone.as_deref(), Some("+1 (555) 010-9999"));
    let manager = AccountRepo::find_manager_of(&pool, CLIENT_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(manager.first_name.as_deref(), Some("Robin"));
    assert_eq!(manager.last_name.as_deref(), Some("Lee"));
    assert_eq!(manager.username, "robin.d");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contact_username_collision_returns_409(pool: PgPool) {
    seed_client(&pool).await;
    sqlx::query("INSERT INTO accounts (id, username) VALUES (2, 'taken')")
        .execute(&pool)
        .await
        .unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        "/api/v1/clients/42/steps/contact",
        json!({ "phone": "555-0199", "username": "taken" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "Username is already taken");
    let client = ClientRepo::find_by_id(&pool, CLIENT_ID).await.unwrap().unwrap();
    assert_eq!(client.phone.as_deref(), Some("555-0100"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_for_missing_client_returns_404(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        "/api/v1/clients/404/steps/additional_info",
        json!({ "dimensions": "10x10" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Client with id 404 not found");
}
