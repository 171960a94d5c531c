use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clients`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(clients::get_client))
        .route("/{id}/steps/{step}", put(clients::apply_step))
        .route("/{id}/attachments/{kind}", post(clients::upload_attachments))
}
