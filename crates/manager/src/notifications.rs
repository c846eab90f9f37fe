//! Reading and acknowledging point-change notifications.

use majoba_core::types::{DbId, Timestamp};
use majoba_db::models::notification::Notification;
use majoba_db::repositories::NotificationRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::ManagerResult;

/// A notification with its age rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub time_elapsed: String,
}

impl NotificationView {
    pub fn new(notification: Notification, now: Timestamp) -> Self {
        let time_elapsed = notification.time_elapsed(now);
        Self {
            notification,
            time_elapsed,
        }
    }
}

/// The owner's `limit` most recent notifications, newest first.
pub async fn recent_notifications(
    pool: &PgPool,
    owner_id: DbId,
    limit: i64,
) -> ManagerResult<Vec<NotificationView>> {
    let now = chrono::Utc::now();
    let rows = NotificationRepo::list_for_owner(pool, owner_id, false, limit, 0).await?;
    Ok(rows
        .into_iter()
        .map(|n| NotificationView::new(n, now))
        .collect())
}

/// Mark one of the owner's notifications read. Returns `false` if it does
/// not exist, belongs to someone else, or was already read.
#[tracing::instrument(skip(pool))]
pub async fn mark_read(pool: &PgPool, owner_id: DbId, notification_id: DbId) -> ManagerResult<bool> {
    Ok(NotificationRepo::mark_read(pool, notification_id, owner_id).await?)
}

/// Mark every unread notification of the owner read.
#[tracing::instrument(skip(pool))]
pub async fn mark_all_read(pool: &PgPool, owner_id: DbId) -> ManagerResult<u64> {
    let updated = NotificationRepo::mark_all_read(pool, owner_id).await?;
    tracing::debug!(updated, "Notifications marked read");
    Ok(updated)
}

pub async fn unread_count(pool: &PgPool, owner_id: DbId) -> ManagerResult<i64> {
    Ok(NotificationRepo::unread_count(pool, owner_id).await?)
}
