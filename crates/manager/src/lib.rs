//! Manager subsystem: the points/level ledger and the account records
//! around it.
//!
//! Every operation takes the pool (and any configuration it needs)
//! explicitly and returns [`error::ManagerResult`].

use majoba_db::DbPool;

pub mod access;
pub mod config;
pub mod error;
pub mod ledger;
pub mod notifications;
pub mod overview;
pub mod projects;
pub mod search;
pub mod telemetry;

use config::ManagerConfig;
use error::ManagerResult;

/// Connect, verify the database answers, and apply pending migrations.
pub async fn connect(config: &ManagerConfig) -> ManagerResult<DbPool> {
    let pool = majoba_db::create_pool(&config.database_url, config.pool_settings()).await?;
    tracing::info!(
        max_connections = config.max_connections,
        "Database connection pool created"
    );

    majoba_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    majoba_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
