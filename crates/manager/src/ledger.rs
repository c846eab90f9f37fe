//! Points/level ledger operations.
//!
//! The balance is only ever mutated by a single storage-level statement
//! (atomic increment or conditional clamped decrement). When a change is
//! notified, the point update, the notification insert and the counter
//! bump commit together in one transaction.
//!
//! Credits and debits do not recompute the stored level; call
//! [`update_level`] for that.

use majoba_core::error::CoreError;
use majoba_core::leveling::{self, AccountLevel};
use majoba_core::notification::NotificationKind;
use majoba_core::points::{self, PointChangeOptions};
use majoba_core::types::{DbId, Points};
use majoba_db::models::ledger::Ledger;
use majoba_db::models::notification::{CreateNotification, Notification};
use majoba_db::repositories::{LedgerRepo, NotificationRepo};
use sqlx::PgPool;

use crate::error::{ManagerError, ManagerResult};

/// Result of a credit or debit.
#[derive(Debug, Clone)]
pub struct PointChange {
    /// The ledger as stored after the change.
    pub ledger: Ledger,
    /// The notification recorded for the change, if one was requested.
    pub notification: Option<Notification>,
}

/// `id` is the ledger id.
fn ledger_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ledger",
        id,
    }
}

/// `id` is the owner id; the owner has no ledger yet.
fn owner_ledger_not_found(owner_id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "user ledger",
        id: owner_id,
    }
}

/// Return the owner's ledger, creating an empty beginner ledger if absent.
///
/// Concurrent first calls for the same owner converge on a single row: the
/// unique constraint on `owner_id` decides the winner and the loser reads
/// the winner's row.
#[tracing::instrument(skip(pool))]
pub async fn get_or_create_ledger(pool: &PgPool, owner_id: DbId) -> ManagerResult<Ledger> {
    let (ledger, created) = LedgerRepo::get_or_create(pool, owner_id)
        .await
        .map_err(|e| ManagerError::from_owner_write(e, owner_id))?;
    if created {
        tracing::info!(ledger_id = ledger.id, "Ledger created");
    }
    Ok(ledger)
}

/// Return the owner's ledger without creating one. A missing ledger is
/// `NotFound` for entity `"user ledger"`, keyed by the owner id.
pub async fn find_ledger(pool: &PgPool, owner_id: DbId) -> ManagerResult<Ledger> {
    LedgerRepo::find_by_owner(pool, owner_id)
        .await?
        .ok_or_else(|| owner_ledger_not_found(owner_id).into())
}

/// Add `amount` points. Non-positive amounts are a no-op.
#[tracing::instrument(skip(pool, ledger, options), fields(ledger_id = ledger.id))]
pub async fn credit(
    pool: &PgPool,
    ledger: &Ledger,
    amount: Points,
    options: &PointChangeOptions,
) -> ManagerResult<PointChange> {
    apply_change(pool, ledger, NotificationKind::Credit, amount, options).await
}

/// Remove `amount` points, clamping the balance at zero. Non-positive
/// amounts are a no-op.
#[tracing::instrument(skip(pool, ledger, options), fields(ledger_id = ledger.id))]
pub async fn debit(
    pool: &PgPool,
    ledger: &Ledger,
    amount: Points,
    options: &PointChangeOptions,
) -> ManagerResult<PointChange> {
    apply_change(pool, ledger, NotificationKind::Debit, amount, options).await
}

/// [`credit`] with an unparsed amount. Malformed input is `InvalidArgument`
/// and nothing is written.
pub async fn credit_raw(
    pool: &PgPool,
    ledger: &Ledger,
    raw_amount: &str,
    options: &PointChangeOptions,
) -> ManagerResult<PointChange> {
    let amount = points::parse_amount(raw_amount)?;
    credit(pool, ledger, amount, options).await
}

/// [`debit`] with an unparsed amount. Malformed input is `InvalidArgument`
/// and nothing is written.
pub async fn debit_raw(
    pool: &PgPool,
    ledger: &Ledger,
    raw_amount: &str,
    options: &PointChangeOptions,
) -> ManagerResult<PointChange> {
    let amount = points::parse_amount(raw_amount)?;
    debit(pool, ledger, amount, options).await
}

async fn apply_change(
    pool: &PgPool,
    ledger: &Ledger,
    kind: NotificationKind,
    amount: Points,
    options: &PointChangeOptions,
) -> ManagerResult<PointChange> {
    if !points::is_effective_amount(amount) {
        tracing::debug!(amount, %kind, "Ignoring non-positive point change");
        return Ok(PointChange {
            ledger: ledger.clone(),
            notification: None,
        });
    }

    let mut tx = pool.begin().await?;

    let changed = match kind {
        NotificationKind::Credit => LedgerRepo::add_points(&mut *tx, ledger.id, amount).await?,
        NotificationKind::Debit => {
            LedgerRepo::subtract_points_clamped(&mut *tx, ledger.id, amount).await?
        }
    }
    .ok_or_else(|| ledger_not_found(ledger.id))?;

    let change = if options.notify {
        let input = CreateNotification {
            owner_id: changed.owner_id,
            kind,
            message: kind.message(amount),
            description: kind.description_or_default(options.description.as_deref()),
        };
        let notification = NotificationRepo::create(&mut *tx, &input).await?;
        let ledger = LedgerRepo::increment_notification_count(&mut *tx, changed.id)
            .await?
            .ok_or_else(|| ledger_not_found(changed.id))?;
        PointChange {
            ledger,
            notification: Some(notification),
        }
    } else {
        PointChange {
            ledger: changed,
            notification: None,
        }
    };

    tx.commit().await?;

    tracing::debug!(
        amount,
        %kind,
        points = change.ledger.points,
        notified = change.notification.is_some(),
        "Point balance changed"
    );
    Ok(change)
}

/// Recompute the stored level from the stored balance and persist it.
///
/// The row is locked while the level is derived, so the persisted level
/// matches the balance at commit time. Calling this twice in a row yields
/// the same level.
#[tracing::instrument(skip(pool, ledger), fields(ledger_id = ledger.id))]
pub async fn update_level(pool: &PgPool, ledger: &Ledger) -> ManagerResult<Ledger> {
    let mut tx = pool.begin().await?;

    let current = LedgerRepo::lock_by_id(&mut *tx, ledger.id)
        .await?
        .ok_or_else(|| ledger_not_found(ledger.id))?;

    let updated = if current.is_level_stale() {
        let level = AccountLevel::for_points(current.points);
        let updated = LedgerRepo::set_level(&mut *tx, current.id, level)
            .await?
            .ok_or_else(|| ledger_not_found(current.id))?;
        tracing::debug!(from = %current.level, to = %level, "Level changed");
        updated
    } else {
        current
    };

    tx.commit().await?;
    Ok(updated)
}

/// Points still needed to leave the ledger's stored level. 0 at `master`.
pub fn points_for_next_level(ledger: &Ledger) -> Points {
    leveling::points_for_next_level(ledger.level, ledger.points)
}

/// Progress through the stored level's range, `0.0..=100.0`. 100 at `master`.
pub fn progress_percentage(ledger: &Ledger) -> f64 {
    leveling::progress_percentage(ledger.level, ledger.points)
}
