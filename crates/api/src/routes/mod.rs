pub mod catalog;
pub mod clients;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /clients/{id}                        client detail (GET)
/// /clients/{id}/steps/{step}           apply a wizard step (PUT)
/// /clients/{id}/attachments/{kind}     multipart upload, field "files" (POST)
///
/// /catalog/services                    service catalog (GET)
/// /catalog/products                    product catalog (GET)
/// /statuses                            workflow status labels (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/clients", clients::router())
        .merge(catalog::router())
}
