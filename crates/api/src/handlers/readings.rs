//! Handlers for the `/readings` resource (display queries).

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use urbansense_core::types::DbId;
use urbansense_db::models::reading::Reading;
use urbansense_db::repositories::ReadingRepo;

use crate::error::AppResult;
use crate::middleware::access::AccessGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum page size for reading queries.
const MAX_LIMIT: i64 = 500;

/// Default page size for reading queries.
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for `GET /readings`.
#[derive(Debug, Deserialize)]
pub struct ReadingQuery {
    /// Restrict to a single sensor.
    pub sensor_id: Option<DbId>,
    /// Maximum number of results. Defaults to 100, capped at 500.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// GET /api/v1/readings
///
/// Recent readings, newest first, optionally filtered by sensor.
pub async fn list(
    AccessGuard(_user): AccessGuard,
    State(state): State<AppState>,
    Query(params): Query<ReadingQuery>,
) -> AppResult<Json<DataResponse<Vec<Reading>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let readings = ReadingRepo::list_recent(&state.pool, params.sensor_id, limit, offset).await?;
    Ok(Json(DataResponse { data: readings }))
}

/// GET /api/v1/readings/latest
///
/// The most recent reading for every sensor -- the same snapshot a feed
/// channel receives in its welcome event.
pub async fn latest(
    AccessGuard(_user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Reading>>>> {
    let readings = ReadingRepo::latest_per_sensor(&state.pool).await?;
    Ok(Json(DataResponse { data: readings }))
}
