//! Threshold-crossing alert models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub sensor_id: DbId,
    pub user_id: DbId,
    pub measured_value: f64,
    pub triggered_threshold: f64,
    pub severity: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// Insert payload for a new alert, built by the alert engine.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub sensor_id: DbId,
    pub user_id: DbId,
    pub measured_value: f64,
    pub triggered_threshold: f64,
    pub severity: &'static str,
}

/// DTO for `PUT /alerts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateAlertStatus {
    pub status: String,
}
