//! Repository for the `thresholds` table.

use sqlx::PgPool;
use urbansense_core::types::DbId;

use crate::models::threshold::Threshold;

const COLUMNS: &str =
    "id, user_id, sensor_type_id, min_value, max_value, is_active, created_at, updated_at";

/// Provides CRUD operations for personal alert thresholds.
pub struct ThresholdRepo;

impl ThresholdRepo {
    /// List all of a user's thresholds, active and disabled.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Threshold>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thresholds \
             WHERE user_id = $1 \
             ORDER BY sensor_type_id, id"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find the user's existing threshold row for a sensor type, if any.
    ///
    /// Uniqueness per (user, sensor type) is maintained by callers doing
    /// find-then-update through this method; when duplicates exist the
    /// newest row wins.
    pub async fn find_for_user_and_type(
        pool: &PgPool,
        user_id: DbId,
        sensor_type_id: DbId,
    ) -> Result<Option<Threshold>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thresholds \
             WHERE user_id = $1 AND sensor_type_id = $2 \
             ORDER BY id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(user_id)
            .bind(sensor_type_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new threshold, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        sensor_type_id: DbId,
        min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> Result<Threshold, sqlx::Error> {
        let query = format!(
            "INSERT INTO thresholds (user_id, sensor_type_id, min_value, max_value) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(user_id)
            .bind(sensor_type_id)
            .bind(min_value)
            .bind(max_value)
            .fetch_one(pool)
            .await
    }

    /// Replace an existing threshold's bounds and re-activate it.
    pub async fn update_bounds(
        pool: &PgPool,
        id: DbId,
        min_value: Option<f64>,
        max_value: Option<f64>,
    ) -> Result<Threshold, sqlx::Error> {
        let query = format!(
            "UPDATE thresholds \
             SET min_value = $2, max_value = $3, is_active = true, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(id)
            .bind(min_value)
            .bind(max_value)
            .fetch_one(pool)
            .await
    }

    /// Soft-disable a threshold. Rows are never deleted.
    ///
    /// Returns `true` if an active threshold belonging to the user was
    /// disabled.
    pub async fn disable(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE thresholds \
             SET is_active = false, updated_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND is_active = true",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active thresholds for a sensor type across a set of users.
    ///
    /// The alert engine calls this with the subscriber set resolved in the
    /// previous step, so thresholds of unsubscribed users are never fetched.
    pub async fn active_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
        sensor_type_id: DbId,
    ) -> Result<Vec<Threshold>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thresholds \
             WHERE user_id = ANY($1) AND sensor_type_id = $2 AND is_active = true \
             ORDER BY id"
        );
        sqlx::query_as::<_, Threshold>(&query)
            .bind(user_ids)
            .bind(sensor_type_id)
            .fetch_all(pool)
            .await
    }
}
