//! Handlers for the `/alerts` resource: alert history and status
//! management.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use urbansense_core::error::CoreError;
use urbansense_core::status::AlertStatus;
use urbansense_core::types::DbId;
use urbansense_db::models::alert::{Alert, UpdateAlertStatus};
use urbansense_db::repositories::AlertRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::access::AccessGuard;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for alert listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for alert listing.
const DEFAULT_LIMIT: i64 = 50;

/// Query parameters for `GET /alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    /// Filter by workflow status (`open`, `in_progress`, `resolved`,
    /// `closed`).
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/alerts
///
/// The caller's own alerts, newest first.
pub async fn list(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Query(params): Query<AlertQuery>,
) -> AppResult<Json<DataResponse<Vec<Alert>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let status = match params.status.as_deref() {
        Some(s) => Some(
            AlertStatus::parse(s)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!("Unknown alert status: {s}")))
                })?
                .as_str(),
        ),
        None => None,
    };

    let alerts = AlertRepo::list_for_user(&state.pool, user.user_id, status, limit, offset).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// PUT /api/v1/alerts/{id}/status
///
/// Transition an alert's workflow status. Manager or admin only.
pub async fn update_status(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAlertStatus>,
) -> AppResult<Json<DataResponse<Alert>>> {
    let status = AlertStatus::parse(&input.status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown alert status: {}",
            input.status
        )))
    })?;

    let alert = AlertRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Alert",
            id,
        }))?;

    tracing::info!(
        alert_id = id,
        status = status.as_str(),
        by_user = user.user_id,
        "Alert status updated"
    );

    Ok(Json(DataResponse { data: alert }))
}
