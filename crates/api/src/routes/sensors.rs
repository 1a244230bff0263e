//! Route definitions for the `/sensors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::sensors;
use crate::state::AppState;

/// Routes mounted at `/sensors`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sensors::list))
        .route("/types", get(sensors::list_types))
        .route("/{id}", get(sensors::get_by_id))
}
