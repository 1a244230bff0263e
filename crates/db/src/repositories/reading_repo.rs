//! Repository for the `readings` table.
//!
//! Readings are append-only; there are no update or delete methods.

use sqlx::PgPool;
use urbansense_core::types::DbId;

use crate::models::reading::{CreateReading, Reading};

/// Column list for `readings` queries.
const COLUMNS: &str = "id, sensor_id, value, unit, recorded_at, validated";

/// Provides access to sensor readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Insert a new reading, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateReading) -> Result<Reading, sqlx::Error> {
        let query = format!(
            "INSERT INTO readings (sensor_id, value, unit, validated) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(input.sensor_id)
            .bind(input.value)
            .bind(&input.unit)
            .bind(input.validated)
            .fetch_one(pool)
            .await
    }

    /// Fetch readings with id greater than `cursor`, in ascending id order,
    /// capped at `limit` rows. This is the broadcast loop's poll query.
    pub async fn list_after(
        pool: &PgPool,
        cursor: DbId,
        limit: i64,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM readings \
             WHERE id > $1 \
             ORDER BY id ASC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Reading>(&query)
            .bind(cursor)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The highest reading id currently in the store, or 0 when empty.
    ///
    /// Used to initialize the broadcast cursor so a fresh feed does not
    /// replay historical backlog.
    pub async fn max_id(pool: &PgPool) -> Result<DbId, sqlx::Error> {
        let max: Option<DbId> = sqlx::query_scalar("SELECT MAX(id) FROM readings")
            .fetch_one(pool)
            .await?;
        Ok(max.unwrap_or(0))
    }

    /// The most recent reading for every sensor that has one.
    ///
    /// Sent as the one-time snapshot in the `connection` welcome event.
    pub async fn latest_per_sensor(pool: &PgPool) -> Result<Vec<Reading>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (sensor_id) {COLUMNS} FROM readings \
             ORDER BY sensor_id, id DESC"
        );
        sqlx::query_as::<_, Reading>(&query).fetch_all(pool).await
    }

    /// List recent readings for display, newest first, optionally filtered
    /// by sensor.
    pub async fn list_recent(
        pool: &PgPool,
        sensor_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Reading>, sqlx::Error> {
        let filter = if sensor_id.is_some() {
            "WHERE sensor_id = $3"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM readings \
             {filter} \
             ORDER BY id DESC \
             LIMIT $1 OFFSET $2"
        );
        let mut q = sqlx::query_as::<_, Reading>(&query).bind(limit).bind(offset);
        if let Some(sensor_id) = sensor_id {
            q = q.bind(sensor_id);
        }
        q.fetch_all(pool).await
    }
}
