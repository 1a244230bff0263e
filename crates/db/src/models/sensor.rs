//! Sensor inventory models.

use serde::Serialize;
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `sensor_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorType {
    pub id: DbId,
    pub name: String,
    pub unit: String,
}

/// A sensor joined with its type and neighborhood, as served to clients
/// and consumed by the alert engine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorContext {
    pub id: DbId,
    pub name: String,
    pub sensor_type_id: DbId,
    pub sensor_type: String,
    pub unit: String,
    pub neighborhood_id: DbId,
    pub neighborhood: String,
    pub is_active: bool,
    pub installed_at: Timestamp,
}
