//! Aggregates for the admin dashboard.

use majoba_core::leveling::AccountLevel;
use majoba_core::types::Points;
use serde::Serialize;
use sqlx::FromRow;

/// Account counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserTotals {
    pub total_users: i64,
    pub staff_users: i64,
    pub active_users: i64,
}

/// Ledger counts and the sum of all balances.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LedgerTotals {
    pub total_ledgers: i64,
    pub total_points: Points,
}

/// Number of ledgers at a stored level.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LevelCount {
    #[sqlx(try_from = "String")]
    pub level: AccountLevel,
    pub count: i64,
}
