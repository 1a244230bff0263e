//! Neighborhood alert subscription models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `subscriptions` table, composite-keyed by
/// (user_id, neighborhood_id).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub user_id: DbId,
    pub neighborhood_id: DbId,
    pub is_active: bool,
    pub alert_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `PUT /subscriptions`: opt in to a neighborhood's alerts.
#[derive(Debug, Deserialize)]
pub struct UpsertSubscription {
    pub neighborhood_id: DbId,
    /// `all` (default) or `critical_only`.
    pub alert_type: Option<String>,
}
