//! Notification entity model.

use majoba_core::notification::{self, NotificationKind};
use majoba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `manager_notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub owner_id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub message: String,
    pub description: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Notification {
    /// Relative age, e.g. `"hace 2 horas"`.
    pub fn time_elapsed(&self, now: Timestamp) -> String {
        notification::time_elapsed(self.created_at, now)
    }
}

/// Values for a new notification row.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub owner_id: DbId,
    pub kind: NotificationKind,
    pub message: String,
    pub description: String,
}
