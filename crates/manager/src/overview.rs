//! Account overview for an owner and aggregate statistics for staff.

use majoba_core::leveling::AccountLevel;
use majoba_core::types::{DbId, Points};
use majoba_db::models::dashboard::{LedgerTotals, LevelCount, UserTotals};
use majoba_db::models::ledger::Ledger;
use majoba_db::models::project::Project;
use majoba_db::models::user::User;
use majoba_db::repositories::{DashboardRepo, ProjectRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::access::require_staff;
use crate::config::OverviewLimits;
use crate::error::ManagerResult;
use crate::ledger;
use crate::notifications::{self, NotificationView};

/// Everything the owner's account page shows.
#[derive(Debug, Clone, Serialize)]
pub struct AccountOverview {
    pub ledger: Ledger,
    /// Owner-facing name of the stored level.
    pub level_label: &'static str,
    pub next_level: AccountLevel,
    pub points_for_next_level: Points,
    pub progress_percentage: f64,
    pub recent_projects: Vec<Project>,
    pub recent_notifications: Vec<NotificationView>,
}

/// Load the owner's overview, creating the ledger on first visit.
#[tracing::instrument(skip(pool, limits))]
pub async fn account_overview(
    pool: &PgPool,
    owner_id: DbId,
    limits: &OverviewLimits,
) -> ManagerResult<AccountOverview> {
    let ledger = ledger::get_or_create_ledger(pool, owner_id).await?;
    let recent_projects = ProjectRepo::list_for_owner(pool, owner_id, Some(limits.projects)).await?;
    let recent_notifications =
        notifications::recent_notifications(pool, owner_id, limits.notifications).await?;

    Ok(AccountOverview {
        level_label: ledger.level.display_name(),
        next_level: ledger.next_level(),
        points_for_next_level: ledger::points_for_next_level(&ledger),
        progress_percentage: ledger::progress_percentage(&ledger),
        ledger,
        recent_projects,
        recent_notifications,
    })
}

/// Staff dashboard figures.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStatistics {
    pub users: UserTotals,
    pub ledgers: LedgerTotals,
    pub levels: Vec<LevelCount>,
}

/// Aggregate figures across all accounts. Staff only.
#[tracing::instrument(skip(pool, requester), fields(requester_id = requester.id))]
pub async fn admin_statistics(pool: &PgPool, requester: &User) -> ManagerResult<AdminStatistics> {
    if let Err(err) = require_staff(requester, "view the admin dashboard") {
        tracing::warn!("Non-staff user requested admin statistics");
        return Err(err.into());
    }

    Ok(AdminStatistics {
        users: DashboardRepo::user_totals(pool).await?,
        ledgers: DashboardRepo::ledger_totals(pool).await?,
        levels: DashboardRepo::level_counts(pool).await?,
    })
}
