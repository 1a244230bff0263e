//! Route definitions for the `/subscriptions` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subscriptions::list).put(subscriptions::upsert))
        .route("/{neighborhood_id}", delete(subscriptions::deactivate))
}
