//! Neighborhood model.

use serde::Serialize;
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `neighborhoods` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Neighborhood {
    pub id: DbId,
    pub name: String,
    pub district: Option<String>,
    pub created_at: Timestamp,
}
