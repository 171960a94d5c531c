//! Handlers for read-only reference data.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use intake_db::repositories::CatalogRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/catalog/services
pub async fn list_services(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let services = CatalogRepo::list_services(&state.pool).await?;
    Ok(Json(DataResponse { data: services }))
}

/// GET /api/v1/catalog/products
pub async fn list_products(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let products = CatalogRepo::list_products(&state.pool).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/statuses
pub async fn list_statuses(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let statuses = CatalogRepo::list_statuses(&state.pool).await?;
    Ok(Json(DataResponse { data: statuses }))
}
