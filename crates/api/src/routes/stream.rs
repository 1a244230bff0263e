//! Route definitions for the live feed.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::stream;
use crate::state::AppState;

/// Routes mounted at `/stream`.
///
/// ```text
/// GET  /        -> SSE feed
/// POST /admin   -> status | broadcast | sensor-update (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stream::stream))
        .route("/admin", post(stream::admin_action))
}
