//! Route tree for the API.

pub mod alerts;
pub mod auth;
pub mod health;
pub mod neighborhoods;
pub mod notifications;
pub mod readings;
pub mod sensors;
pub mod stream;
pub mod subscriptions;
pub mod thresholds;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout (requires auth)
///
/// /stream                          SSE feed (token via query param)
/// /stream/admin                    manual loop actions (admin only)
///
/// /readings                        recent readings (GET)
/// /readings/latest                 latest reading per sensor (GET)
///
/// /sensors                         sensor inventory (GET)
/// /sensors/types                   sensor type vocabulary (GET)
/// /sensors/{id}                    single sensor (GET)
///
/// /neighborhoods                   neighborhood list (GET)
///
/// /thresholds                      own thresholds (GET), upsert (PUT)
/// /thresholds/{id}                 soft-disable (DELETE)
///
/// /subscriptions                   own subscriptions (GET), opt-in (PUT)
/// /subscriptions/{neighborhood_id} opt-out (DELETE)
///
/// /notifications                   own notifications (GET)
/// /notifications/read-all          acknowledge all (POST)
/// /notifications/unread-count      unread counter (GET)
/// /notifications/{id}/read         acknowledge one (POST)
///
/// /alerts                          own alerts (GET)
/// /alerts/{id}/status              status transition (PUT, manager/admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/stream", stream::router())
        .nest("/readings", readings::router())
        .nest("/sensors", sensors::router())
        .nest("/neighborhoods", neighborhoods::router())
        .nest("/thresholds", thresholds::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/notifications", notifications::router())
        .nest("/alerts", alerts::router())
}
