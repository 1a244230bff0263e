//! Repository for the `alerts` table.

use sqlx::PgPool;
use urbansense_core::types::{DbId, Timestamp};

use crate::models::alert::{Alert, CreateAlert};

const COLUMNS: &str = "id, sensor_id, user_id, measured_value, triggered_threshold, \
                       severity, status, created_at";

/// Provides CRUD operations for threshold-crossing alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert with status `open`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (sensor_id, user_id, measured_value, triggered_threshold, severity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.sensor_id)
            .bind(input.user_id)
            .bind(input.measured_value)
            .bind(input.triggered_threshold)
            .bind(input.severity)
            .fetch_one(pool)
            .await
    }

    /// Duplicate-suppression pre-check: does an `open` alert for this
    /// (sensor, user) pair exist at or after `since`?
    ///
    /// Best-effort under concurrent writers -- there is no database
    /// constraint backing this invariant.
    pub async fn open_exists_since(
        pool: &PgPool,
        sensor_id: DbId,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<DbId> = sqlx::query_scalar(
            "SELECT id FROM alerts \
             WHERE sensor_id = $1 AND user_id = $2 AND status = 'open' \
               AND created_at >= $3 \
             LIMIT 1",
        )
        .bind(sensor_id)
        .bind(user_id)
        .bind(since)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }

    /// List a user's alerts, newest first, optionally filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let filter = if status.is_some() { "AND status = $4" } else { "" };
        let query = format!(
            "SELECT {COLUMNS} FROM alerts \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let mut q = sqlx::query_as::<_, Alert>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset);
        if let Some(status) = status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Transition an alert's workflow status, returning the updated row.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
