use majoba_core::error::CoreError;
use majoba_core::types::DbId;

/// Error type for every manager operation.
///
/// Wraps [`CoreError`] for domain errors and adds storage, validation and
/// configuration failures. Nothing is swallowed: callers decide what the
/// account owner sees.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// A domain-level error from `majoba_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Persistence failed or is unreachable.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Schema migrations could not be applied.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Input DTO failed `validator` rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// An environment variable is missing or unparseable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for manager return values.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// PostgreSQL foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

impl ManagerError {
    /// Classify an error from a write that references `owner_id`.
    ///
    /// A violation of one of the `fk_*_owner` constraints means the account
    /// does not exist and becomes `NotFound`. Everything else is storage.
    pub fn from_owner_write(err: sqlx::Error, owner_id: DbId) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let is_owner_fk = db_err
                .constraint()
                .is_some_and(|c| c.starts_with("fk_") && c.ends_with("_owner"));
            if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) && is_owner_fk {
                return CoreError::NotFound {
                    entity: "user",
                    id: owner_id,
                }
                .into();
            }
        }
        Self::Storage(err)
    }

    /// Whether this is a `NotFound` for the given entity.
    pub fn is_not_found(&self, entity: &str) -> bool {
        matches!(self, Self::Core(CoreError::NotFound { entity: e, .. }) if *e == entity)
    }
}
