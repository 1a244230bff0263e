//! Route definitions for the `/readings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::readings;
use crate::state::AppState;

/// Routes mounted at `/readings`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(readings::list))
        .route("/latest", get(readings::latest))
}
