//! Repository for the `manager_notifications` table.

use majoba_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `manager_notifications` queries.
const COLUMNS: &str =
    "id, owner_id, kind, message, description, is_read, created_at, updated_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO manager_notifications (owner_id, kind, message, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.owner_id)
            .bind(input.kind.as_str())
            .bind(&input.message)
            .bind(&input.description)
            .fetch_one(executor)
            .await
    }

    /// List notifications for an owner, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM manager_notifications \
             WHERE owner_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification was found for the given owner and
    /// updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE manager_notifications SET is_read = true \
             WHERE id = $1 AND owner_id = $2 AND is_read = false",
        )
        .bind(notification_id)
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for an owner.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, owner_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE manager_notifications SET is_read = true \
             WHERE owner_id = $1 AND is_read = false",
        )
        .bind(owner_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Number of unread notifications for an owner.
    pub async fn unread_count(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM manager_notifications WHERE owner_id = $1 AND is_read = false",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Number of notifications ever recorded for an owner.
    pub async fn count_for_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM manager_notifications WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
