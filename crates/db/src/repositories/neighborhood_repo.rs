//! Repository for the `neighborhoods` table.

use sqlx::PgPool;
use urbansense_core::types::DbId;

use crate::models::neighborhood::Neighborhood;

const COLUMNS: &str = "id, name, district, created_at";

/// Provides read access to neighborhoods.
pub struct NeighborhoodRepo;

impl NeighborhoodRepo {
    /// List all neighborhoods.
    pub async fn list(pool: &PgPool) -> Result<Vec<Neighborhood>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM neighborhoods ORDER BY name");
        sqlx::query_as::<_, Neighborhood>(&query).fetch_all(pool).await
    }

    /// Check a neighborhood exists before accepting a subscription to it.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM neighborhoods WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(found.is_some())
    }
}
