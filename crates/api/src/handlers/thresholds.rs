//! Handlers for the `/thresholds` resource: the caller's personal alert
//! boundaries per sensor type.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use urbansense_core::error::CoreError;
use urbansense_core::types::DbId;
use urbansense_db::models::threshold::{Threshold, UpsertThreshold};
use urbansense_db::repositories::{SensorRepo, ThresholdRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::access::AccessGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/thresholds
///
/// All of the caller's thresholds, active and disabled.
pub async fn list(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Threshold>>>> {
    let thresholds = ThresholdRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: thresholds }))
}

/// PUT /api/v1/thresholds
///
/// Upsert the caller's threshold for a sensor type: find the existing row
/// and replace its bounds, or create one. Uniqueness per (user, sensor
/// type) rests entirely on this find-then-update sequence; there is no
/// database constraint behind it, so concurrent submissions can race.
pub async fn upsert(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Json(input): Json<UpsertThreshold>,
) -> AppResult<Json<DataResponse<Threshold>>> {
    validate_bounds(&input)?;

    // The sensor type must exist; a dangling id would make a threshold
    // that can never match a reading.
    let known_type = SensorRepo::list_types(&state.pool)
        .await?
        .iter()
        .any(|t| t.id == input.sensor_type_id);
    if !known_type {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SensorType",
            id: input.sensor_type_id,
        }));
    }

    let existing =
        ThresholdRepo::find_for_user_and_type(&state.pool, user.user_id, input.sensor_type_id)
            .await?;

    let threshold = match existing {
        Some(existing) => {
            ThresholdRepo::update_bounds(&state.pool, existing.id, input.min_value, input.max_value)
                .await?
        }
        None => {
            ThresholdRepo::create(
                &state.pool,
                user.user_id,
                input.sensor_type_id,
                input.min_value,
                input.max_value,
            )
            .await?
        }
    };

    Ok(Json(DataResponse { data: threshold }))
}

/// DELETE /api/v1/thresholds/{id}
///
/// Soft-disable a threshold (sets `is_active = false`; the row is kept).
/// Returns 204 No Content, or 404 if the caller has no such active
/// threshold.
pub async fn disable(
    AccessGuard(user): AccessGuard,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = ThresholdRepo::disable(&state.pool, id, user.user_id).await?;
    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Threshold",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// A threshold with no bounds can never fire; one with inverted bounds
/// would fire on everything between them.
fn validate_bounds(input: &UpsertThreshold) -> Result<(), AppError> {
    if input.min_value.is_none() && input.max_value.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one of min_value or max_value must be set".into(),
        )));
    }
    if let (Some(min), Some(max)) = (input.min_value, input.max_value) {
        if min >= max {
            return Err(AppError::Core(CoreError::Validation(
                "min_value must be less than max_value".into(),
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn rejects_empty_bounds() {
        let input = UpsertThreshold {
            sensor_type_id: 1,
            min_value: None,
            max_value: None,
        };
        assert_matches!(
            validate_bounds(&input),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn rejects_inverted_bounds() {
        let input = UpsertThreshold {
            sensor_type_id: 1,
            min_value: Some(100.0),
            max_value: Some(10.0),
        };
        assert_matches!(
            validate_bounds(&input),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn accepts_single_bound() {
        let input = UpsertThreshold {
            sensor_type_id: 1,
            min_value: None,
            max_value: Some(100.0),
        };
        assert!(validate_bounds(&input).is_ok());
    }
}
