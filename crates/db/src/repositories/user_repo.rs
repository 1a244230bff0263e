//! Repository for the `users` table.

use sqlx::PgPool;
use urbansense_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, User};

const COLUMNS: &str = "id, username, email, password_hash, role_id, is_active, \
                       last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Provides account lookup and login-bookkeeping operations.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new user, returning the generated id. Used by the startup
    /// bootstrap; there is no public registration surface.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash, role_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.role_id)
        .fetch_one(pool)
        .await
    }

    /// Total number of user accounts.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count.unwrap_or(0))
    }

    /// Increment the failed-login counter after a wrong password.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users \
             SET failed_login_count = failed_login_count + 1, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Temporarily lock an account after repeated failed logins.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        locked_until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET locked_until = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(locked_until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset failure bookkeeping and stamp `last_login_at` on success.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users \
             SET failed_login_count = 0, locked_until = NULL, \
                 last_login_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
