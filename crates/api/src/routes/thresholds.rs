//! Route definitions for the `/thresholds` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::thresholds;
use crate::state::AppState;

/// Routes mounted at `/thresholds`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(thresholds::list).put(thresholds::upsert))
        .route("/{id}", delete(thresholds::disable))
}
