//! Role model.

use serde::Serialize;
use sqlx::FromRow;
use urbansense_core::types::DbId;

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}
