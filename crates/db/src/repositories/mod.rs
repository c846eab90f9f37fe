//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool`, or any `PgExecutor` where the call has to be able to
//! join a caller-owned transaction.

pub mod dashboard_repo;
pub mod ledger_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod user_repo;

pub use dashboard_repo::DashboardRepo;
pub use ledger_repo::LedgerRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
