//! Handlers for the `/neighborhoods` resource (read-only).

use axum::extract::State;
use axum::Json;
use urbansense_db::models::neighborhood::Neighborhood;
use urbansense_db::repositories::NeighborhoodRepo;

use crate::error::AppResult;
use crate::middleware::access::AccessGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/neighborhoods
pub async fn list(
    AccessGuard(_user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Neighborhood>>>> {
    let neighborhoods = NeighborhoodRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: neighborhoods }))
}
