use std::sync::Arc;

use urbansense_events::Broadcaster;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: urbansense_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Broadcast loop context: feed channels, cursor, alert engine.
    pub broadcaster: Arc<Broadcaster>,
}
