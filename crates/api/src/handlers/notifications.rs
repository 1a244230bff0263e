//! Handlers for the `/notifications` resource.
//!
//! All endpoints operate on the authenticated caller's own notifications.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use urbansense_core::error::CoreError;
use urbansense_core::types::DbId;
use urbansense_db::models::notification::Notification;
use urbansense_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::access::AccessGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for notification listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for notification listing.
const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread (`pending`/`sent`) notifications.
    pub unread_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// GET /api/v1/notifications
///
/// List the caller's notifications, newest first. Fetching counts as
/// delivery: any `pending` rows transition to `sent` before the page is
/// read.
pub async fn list(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let unread_only = params.unread_only.unwrap_or(false);

    NotificationRepo::mark_pending_sent(&state.pool, user.user_id).await?;

    let notifications =
        NotificationRepo::list_for_user(&state.pool, user.user_id, unread_only, limit, offset)
            .await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Acknowledge a single notification. Returns 204 No Content, or 404 if
/// the notification does not belong to the caller or is already read.
pub async fn mark_read(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, user.user_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// Acknowledge everything. Returns the number of notifications marked.
pub async fn mark_all_read(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, user.user_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, user.user_id).await?;
    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}
