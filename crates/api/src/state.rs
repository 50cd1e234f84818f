use std::sync::Arc;

use schoolerp_storage::ImageStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted internally and the rest
/// sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: schoolerp_db::DbPool,
    /// Server configuration, including the public serving origin.
    pub config: Arc<ServerConfig>,
    /// Photo object store.
    pub images: Arc<dyn ImageStore>,
}
