use std::sync::Arc;
use std::time::Duration;

use intake_core::file_storage::FileStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: intake_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Provider that turns uploaded files into durable URLs.
    pub file_storage: Arc<dyn FileStorage>,
}

impl AppState {
    /// Timeout applied to each atomic storage unit.
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_secs(self.config.transaction_timeout_secs)
    }
}
