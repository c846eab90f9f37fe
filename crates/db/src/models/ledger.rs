//! Points/level ledger model.

use majoba_core::leveling::{self, AccountLevel};
use majoba_core::types::{DbId, Points, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `manager_ledgers` table. One per account.
///
/// `level` is persisted, not computed: it only follows `points` after an
/// explicit recompute.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ledger {
    pub id: DbId,
    pub owner_id: DbId,
    pub points: Points,
    #[sqlx(try_from = "String")]
    pub level: AccountLevel,
    pub notification_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Ledger {
    /// Points missing to leave the stored level.
    pub fn points_for_next_level(&self) -> Points {
        leveling::points_for_next_level(self.level, self.points)
    }

    /// Progress through the stored level's range, `0.0..=100.0`.
    pub fn progress_percentage(&self) -> f64 {
        leveling::progress_percentage(self.level, self.points)
    }

    /// The level after the stored one.
    pub fn next_level(&self) -> AccountLevel {
        self.level.next()
    }

    /// Whether the stored level lags behind the balance.
    pub fn is_level_stale(&self) -> bool {
        AccountLevel::for_points(self.points) != self.level
    }
}
