use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Reference data routes, merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog/services", get(catalog::list_services))
        .route("/catalog/products", get(catalog::list_products))
        .route("/statuses", get(catalog::list_statuses))
}
