//! Personal alert threshold models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `thresholds` table.
///
/// One row per (user, sensor type) is the expectation; it is upheld by the
/// application's find-then-update upsert, not a database constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Threshold {
    pub id: DbId,
    pub user_id: DbId,
    pub sensor_type_id: DbId,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /thresholds`: upsert the caller's threshold for a sensor type.
#[derive(Debug, Deserialize)]
pub struct UpsertThreshold {
    pub sensor_type_id: DbId,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}
