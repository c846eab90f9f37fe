use anyhow::Context;
use majoba_db::repositories::DashboardRepo;
use majoba_manager::config::ManagerConfig;
use majoba_manager::telemetry;

/// Bring the manager schema up to date and report what is stored.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ManagerConfig::from_env().context("Failed to load configuration")?;

    // --- Tracing ---
    telemetry::init_tracing(config.log_format);

    // --- Database ---
    let pool = majoba_manager::connect(&config)
        .await
        .context("Failed to prepare the database")?;

    let totals = DashboardRepo::ledger_totals(&pool).await?;
    tracing::info!(
        ledgers = totals.total_ledgers,
        points = totals.total_points,
        "Manager schema ready"
    );

    pool.close().await;
    Ok(())
}
