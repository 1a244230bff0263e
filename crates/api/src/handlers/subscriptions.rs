//! Handlers for the `/subscriptions` resource: neighborhood alert opt-ins.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use urbansense_core::error::CoreError;
use urbansense_core::types::DbId;
use urbansense_db::models::subscription::{Subscription, UpsertSubscription};
use urbansense_db::repositories::{NeighborhoodRepo, SubscriptionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::access::AccessGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Accepted `alert_type` values.
const ALERT_TYPES: &[&str] = &["all", "critical_only"];

/// GET /api/v1/subscriptions
pub async fn list(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Subscription>>>> {
    let subscriptions = SubscriptionRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: subscriptions }))
}

/// PUT /api/v1/subscriptions
///
/// Opt in to a neighborhood's alerts (re-activates a previous opt-out).
pub async fn upsert(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Json(input): Json<UpsertSubscription>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    let alert_type = input.alert_type.as_deref().unwrap_or("all");
    if !ALERT_TYPES.contains(&alert_type) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "alert_type must be one of: {}",
            ALERT_TYPES.join(", ")
        ))));
    }

    if !NeighborhoodRepo::exists(&state.pool, input.neighborhood_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Neighborhood",
            id: input.neighborhood_id,
        }));
    }

    let subscription =
        SubscriptionRepo::upsert(&state.pool, user.user_id, input.neighborhood_id, alert_type)
            .await?;
    Ok(Json(DataResponse { data: subscription }))
}

/// DELETE /api/v1/subscriptions/{neighborhood_id}
///
/// Opt out. Returns 204 No Content, or 404 if no active subscription
/// exists for that neighborhood.
pub async fn deactivate(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Path(neighborhood_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = SubscriptionRepo::deactivate(&state.pool, user.user_id, neighborhood_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: neighborhood_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
