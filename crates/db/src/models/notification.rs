//! Notification models.

use serde::Serialize;
use sqlx::FromRow;
use urbansense_core::types::{DbId, Timestamp};

/// A row from the `notifications` table. One per alert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub alert_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub status: String,
    pub sent_at: Option<Timestamp>,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
