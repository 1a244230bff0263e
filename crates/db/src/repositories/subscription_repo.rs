//! Repository for the `subscriptions` table.

use sqlx::PgPool;
use urbansense_core::types::DbId;

use crate::models::subscription::Subscription;

const COLUMNS: &str = "user_id, neighborhood_id, is_active, alert_type, created_at, updated_at";

/// Provides CRUD operations for neighborhood alert subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Ids of all users with an active subscription to a neighborhood.
    ///
    /// This is the alert engine's first gate: an empty result short-circuits
    /// the whole evaluation.
    pub async fn active_user_ids(
        pool: &PgPool,
        neighborhood_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM subscriptions \
             WHERE neighborhood_id = $1 AND is_active = true",
        )
        .bind(neighborhood_id)
        .fetch_all(pool)
        .await
    }

    /// List a user's subscriptions, active and disabled.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE user_id = $1 \
             ORDER BY neighborhood_id"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Opt a user in to a neighborhood's alerts, re-activating a previous
    /// opt-out if one exists. The composite primary key makes this a real
    /// database upsert.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        neighborhood_id: DbId,
        alert_type: &str,
    ) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions (user_id, neighborhood_id, alert_type) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, neighborhood_id) \
             DO UPDATE SET is_active = true, alert_type = $3, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .bind(neighborhood_id)
            .bind(alert_type)
            .fetch_one(pool)
            .await
    }

    /// Opt a user out of a neighborhood's alerts.
    ///
    /// Returns `true` if an active subscription was deactivated.
    pub async fn deactivate(
        pool: &PgPool,
        user_id: DbId,
        neighborhood_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subscriptions \
             SET is_active = false, updated_at = NOW() \
             WHERE user_id = $1 AND neighborhood_id = $2 AND is_active = true",
        )
        .bind(user_id)
        .bind(neighborhood_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
