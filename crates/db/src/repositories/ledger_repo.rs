//! Repository for the `manager_ledgers` table.
//!
//! Point mutations are single statements evaluated by Postgres against the
//! current row, never read-modify-write in application memory, so
//! concurrent writers to the same ledger cannot lose updates.

use majoba_core::leveling::AccountLevel;
use majoba_core::types::{DbId, Points};
use sqlx::{PgExecutor, PgPool};

use crate::models::ledger::Ledger;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, points, level, notification_count, created_at, updated_at";

/// Provides storage operations for points ledgers.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Insert a fresh ledger for `owner_id` unless one already exists.
    ///
    /// Returns `None` when the unique constraint on `owner_id` kept an
    /// existing row (including one inserted by a concurrent caller).
    pub async fn create_if_absent(
        executor: impl PgExecutor<'_>,
        owner_id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "INSERT INTO manager_ledgers (owner_id)
             VALUES ($1)
             ON CONFLICT (owner_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(owner_id)
            .fetch_optional(executor)
            .await
    }

    /// Return the ledger for `owner_id`, creating it if needed.
    ///
    /// The second value is `true` when this call created the row.
    pub async fn get_or_create(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<(Ledger, bool), sqlx::Error> {
        if let Some(created) = Self::create_if_absent(pool, owner_id).await? {
            return Ok((created, true));
        }
        let query = format!("SELECT {COLUMNS} FROM manager_ledgers WHERE owner_id = $1");
        let existing = sqlx::query_as::<_, Ledger>(&query)
            .bind(owner_id)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }

    /// Find a ledger by its owner.
    pub async fn find_by_owner(
        executor: impl PgExecutor<'_>,
        owner_id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manager_ledgers WHERE owner_id = $1");
        sqlx::query_as::<_, Ledger>(&query)
            .bind(owner_id)
            .fetch_optional(executor)
            .await
    }

    /// Find a ledger by its internal ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manager_ledgers WHERE id = $1");
        sqlx::query_as::<_, Ledger>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lock a ledger row for the rest of the surrounding transaction.
    pub async fn lock_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manager_ledgers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Ledger>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Atomically add `amount` to the balance, returning the reloaded row.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn add_points(
        executor: impl PgExecutor<'_>,
        id: DbId,
        amount: Points,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "UPDATE manager_ledgers SET points = points + $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(executor)
            .await
    }

    /// Atomically subtract `amount` from the balance, clamping at zero.
    ///
    /// The comparison and the subtraction happen in one conditional UPDATE
    /// against the row's current value. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn subtract_points_clamped(
        executor: impl PgExecutor<'_>,
        id: DbId,
        amount: Points,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "UPDATE manager_ledgers SET
                points = CASE WHEN points >= $2 THEN points - $2 ELSE 0 END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(executor)
            .await
    }

    /// Atomically bump the notification counter by one.
    pub async fn increment_notification_count(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "UPDATE manager_ledgers SET notification_count = notification_count + 1
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Persist a level.
    pub async fn set_level(
        executor: impl PgExecutor<'_>,
        id: DbId,
        level: AccountLevel,
    ) -> Result<Option<Ledger>, sqlx::Error> {
        let query = format!(
            "UPDATE manager_ledgers SET level = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ledger>(&query)
            .bind(id)
            .bind(level.as_str())
            .fetch_optional(executor)
            .await
    }
}
