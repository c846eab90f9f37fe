#![allow(dead_code)]

use majoba_db::models::ledger::Ledger;
use majoba_manager::config::ManagerConfig;
use majoba_db::models::user::{CreateUser, User};
use majoba_db::repositories::{LedgerRepo, UserRepo};
use sqlx::PgPool;

/// Create a regular (non-staff) account.
pub async fn user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Create a staff account.
pub async fn staff(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            is_staff: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

/// Create an account whose ledger holds `points` at the given stored level.
pub async fn ledger_with(
    pool: &PgPool,
    username: &str,
    points: i64,
    level: majoba_core::leveling::AccountLevel,
) -> Ledger {
    let owner = user(pool, username).await;
    let (ledger, _) = LedgerRepo::get_or_create(pool, owner.id).await.unwrap();
    if points > 0 {
        LedgerRepo::add_points(pool, ledger.id, points).await.unwrap();
    }
    LedgerRepo::set_level(pool, ledger.id, level)
        .await
        .unwrap()
        .unwrap()
}

/// Configuration with defaults and the given search page size.
pub fn config(search_page_size: i64) -> ManagerConfig {
    let page_size = search_page_size.to_string();
    ManagerConfig::from_lookup(|key: &str| match key {
        "DATABASE_URL" => Some("postgres://localhost/majoba_test".to_string()),
        "SEARCH_PAGE_SIZE" => Some(page_size.clone()),
        _ => None,
    })
    .unwrap()
}
