//! Aggregate queries for the admin dashboard.

use sqlx::PgPool;

use crate::models::dashboard::{LedgerTotals, LevelCount, UserTotals};

/// Read-only aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Total, staff and active account counts.
    pub async fn user_totals(pool: &PgPool) -> Result<UserTotals, sqlx::Error> {
        sqlx::query_as::<_, UserTotals>(
            "SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE is_staff) AS staff_users,
                COUNT(*) FILTER (WHERE is_active) AS active_users
             FROM users",
        )
        .fetch_one(pool)
        .await
    }

    /// Number of ledgers and the sum of their balances.
    pub async fn ledger_totals(pool: &PgPool) -> Result<LedgerTotals, sqlx::Error> {
        sqlx::query_as::<_, LedgerTotals>(
            "SELECT
                COUNT(*) AS total_ledgers,
                COALESCE(SUM(points), 0)::BIGINT AS total_points
             FROM manager_ledgers",
        )
        .fetch_one(pool)
        .await
    }

    /// Ledger count per stored level. Levels without ledgers are omitted.
    pub async fn level_counts(pool: &PgPool) -> Result<Vec<LevelCount>, sqlx::Error> {
        sqlx::query_as::<_, LevelCount>(
            "SELECT level, COUNT(*) AS count
             FROM manager_ledgers
             GROUP BY level
             ORDER BY level",
        )
        .fetch_all(pool)
        .await
    }
}
