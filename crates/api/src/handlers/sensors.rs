//! Handlers for the `/sensors` resource (read-only inventory).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use urbansense_core::error::CoreError;
use urbansense_core::types::DbId;
use urbansense_db::models::sensor::{SensorContext, SensorType};
use urbansense_db::repositories::SensorRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::access::AccessGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /sensors`.
#[derive(Debug, Deserialize)]
pub struct SensorQuery {
    pub neighborhood_id: Option<DbId>,
}

/// GET /api/v1/sensors
///
/// The sensor inventory with type and neighborhood resolved, optionally
/// restricted to one neighborhood.
pub async fn list(
    AccessGuard(_user): AccessGuard,
    State(state): State<AppState>,
    Query(params): Query<SensorQuery>,
) -> AppResult<Json<DataResponse<Vec<SensorContext>>>> {
    let sensors = SensorRepo::list(&state.pool, params.neighborhood_id).await?;
    Ok(Json(DataResponse { data: sensors }))
}

/// GET /api/v1/sensors/types
///
/// The sensor type vocabulary (used by the threshold settings form).
pub async fn list_types(
    AccessGuard(_user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SensorType>>>> {
    let types = SensorRepo::list_types(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// GET /api/v1/sensors/{id}
pub async fn get_by_id(
    AccessGuard(_user): AccessGuard,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SensorContext>>> {
    let sensor = SensorRepo::find_context(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Sensor",
            id,
        }))?;
    Ok(Json(DataResponse { data: sensor }))
}
