//! Route definitions for the `/neighborhoods` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::neighborhoods;
use crate::state::AppState;

/// Routes mounted at `/neighborhoods`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(neighborhoods::list))
}
