//! Sensor reading model.

use serde::Serialize;
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `readings` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reading {
    pub id: DbId,
    pub sensor_id: DbId,
    pub value: f64,
    pub unit: String,
    pub recorded_at: Timestamp,
    pub validated: bool,
}

/// Insert payload for a new reading.
#[derive(Debug, Clone)]
pub struct CreateReading {
    pub sensor_id: DbId,
    pub value: f64,
    pub unit: String,
    pub validated: bool,
}
