//! Repository for the `notifications` table.

use sqlx::PgPool;
use urbansense_core::types::DbId;

use crate::models::notification::Notification;

const COLUMNS: &str =
    "id, alert_id, user_id, title, message, status, sent_at, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a `pending` notification for an alert, returning the
    /// generated id.
    pub async fn create(
        pool: &PgPool,
        alert_id: DbId,
        user_id: DbId,
        title: &str,
        message: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications (alert_id, user_id, title, message) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(alert_id)
        .bind(user_id)
        .bind(title)
        .bind(message)
        .fetch_one(pool)
        .await
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only `pending`/`sent` rows are
    /// returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND status <> 'read'"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Transition all of a user's `pending` notifications to `sent`.
    ///
    /// Called when the user's client fetches their notification list;
    /// returns the number of rows transitioned.
    pub async fn mark_pending_sent(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = 'sent', sent_at = NOW() \
             WHERE user_id = $1 AND status = 'pending'",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found for the given user and
    /// was not already read.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = 'read', read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND status <> 'read'",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's unread notifications as read.
    ///
    /// Returns the number of notifications that were marked.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET status = 'read', read_at = NOW() \
             WHERE user_id = $1 AND status <> 'read'",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The number of unread (`pending` or `sent`) notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND status <> 'read'",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
