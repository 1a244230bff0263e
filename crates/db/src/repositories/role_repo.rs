//! Repository for the `roles` table.

use sqlx::PgPool;
use urbansense_core::types::DbId;

/// Provides role lookups.
pub struct RoleRepo;

impl RoleRepo {
    /// Resolve a role id to its name.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a role id by name.
    pub async fn find_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
