//! Database access layer: connection pool helpers, entity models, and
//! repositories.
//!
//! Repositories are zero-sized structs whose async methods take `&PgPool`
//! as the first argument; models are `FromRow` structs matching table rows
//! plus the DTOs used for inserts and patches.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

/// Shared connection pool type used across the workspace.
pub type DbPool = sqlx::PgPool;

/// Default maximum number of pooled connections.
const DEFAULT_POOL_MAX: u32 = 5;

/// Create a PostgreSQL connection pool for the given URL.
///
/// Pool size defaults to 5 connections and can be overridden with the
/// `DB_POOL_MAX` environment variable.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let max_connections: u32 = std::env::var("DB_POOL_MAX")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_POOL_MAX);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round-trip query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply all pending migrations embedded from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
