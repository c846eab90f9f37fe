//! Integration tests for projects, notifications, the account overview,
//! staff statistics and user search.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use majoba_core::error::CoreError;
use majoba_core::leveling::AccountLevel;
use majoba_core::points::PointChangeOptions;
use majoba_db::models::project::{CreateProject, UpdateProject};
use majoba_db::models::user::CreateUser;
use majoba_db::repositories::UserRepo;
use majoba_manager::config::OverviewLimits;
use majoba_manager::error::ManagerError;
use majoba_manager::{ledger, notifications, overview, projects, search};
use sqlx::PgPool;
use tokio::task::JoinSet;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: Some("Relevamiento de campo".to_string()),
        location: None,
        start_date: date(2024, 2, 1),
        end_date: Some(date(2024, 12, 31)),
        is_active: None,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_list_projects(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;

    let created = projects::create_project(&pool, owner.id, &new_project("Norte"))
        .await
        .unwrap();
    projects::create_project(&pool, owner.id, &new_project("Sur"))
        .await
        .unwrap();

    assert_eq!(created.description, "Relevamiento de campo");
    assert_eq!(created.location, "");

    let listed = projects::list_projects(&pool, owner.id).await.unwrap();
    let names: Vec<_> = listed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Sur", "Norte"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_validates_input(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;

    let blank = CreateProject {
        name: String::new(),
        ..new_project("x")
    };
    assert_matches!(
        projects::create_project(&pool, owner.id, &blank).await,
        Err(ManagerError::Validation(_))
    );

    let too_long = CreateProject {
        location: Some("x".repeat(256)),
        ..new_project("Largo")
    };
    assert_matches!(
        projects::create_project(&pool, owner.id, &too_long).await,
        Err(ManagerError::Validation(_))
    );

    let backwards = CreateProject {
        start_date: date(2024, 6, 1),
        end_date: Some(date(2024, 1, 1)),
        ..new_project("Al revés")
    };
    assert_matches!(
        projects::create_project(&pool, owner.id, &backwards).await,
        Err(ManagerError::Core(CoreError::InvalidArgument(_)))
    );

    assert!(projects::list_projects(&pool, owner.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_for_unknown_owner(pool: PgPool) {
    let result = projects::create_project(&pool, 555_555, &new_project("Huérfano")).await;
    assert!(result.unwrap_err().is_not_found("user"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_modify_own_project(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;
    let project = projects::create_project(&pool, owner.id, &new_project("Este"))
        .await
        .unwrap();

    let updated = projects::modify_project(
        &pool,
        owner.id,
        project.id,
        &UpdateProject {
            location: Some("San Juan".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.location, "San Juan");
    assert_eq!(updated.name, "Este");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_modify_checks_merged_date_range(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;
    let project = projects::create_project(&pool, owner.id, &new_project("Oeste"))
        .await
        .unwrap();

    // New start date after the stored end date.
    let result = projects::modify_project(
        &pool,
        owner.id,
        project.id,
        &UpdateProject {
            start_date: Some(date(2025, 3, 1)),
            ..Default::default()
        },
    )
    .await;
    assert_matches!(result, Err(ManagerError::Core(CoreError::InvalidArgument(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_modify_can_make_project_open_ended(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;
    let project = projects::create_project(
        &pool,
        owner.id,
        &CreateProject {
            end_date: Some(date(2024, 6, 1)),
            ..new_project("Temporal")
        },
    )
    .await
    .unwrap();

    let renamed = projects::modify_project(
        &pool,
        owner.id,
        project.id,
        &UpdateProject {
            name: Some("Temporal II".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.end_date, Some(date(2024, 6, 1)));

    let open = projects::modify_project(
        &pool,
        owner.id,
        project.id,
        &UpdateProject {
            end_date: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(open.end_date, None);

    // With no end date, any later start date is acceptable.
    let moved = projects::modify_project(
        &pool,
        owner.id,
        project.id,
        &UpdateProject {
            start_date: Some(date(2026, 1, 1)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.start_date, date(2026, 1, 1));
    assert_eq!(moved.end_date, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_edits_cannot_invert_date_range(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;
    // Runs 2024-02-01 ..= 2024-12-31.
    let project = projects::create_project(&pool, owner.id, &new_project("Disputado"))
        .await
        .unwrap();

    // Each edit is valid on its own; applied together the range inverts.
    let edits = [
        UpdateProject {
            end_date: Some(Some(date(2024, 3, 1))),
            ..Default::default()
        },
        UpdateProject {
            start_date: Some(date(2024, 6, 1)),
            ..Default::default()
        },
    ];

    let mut tasks = JoinSet::new();
    for edit in edits {
        let pool = pool.clone();
        let (owner_id, project_id) = (owner.id, project.id);
        tasks.spawn(async move {
            projects::modify_project(&pool, owner_id, project_id, &edit).await
        });
    }

    let mut applied = 0;
    let mut rejected = 0;
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => applied += 1,
            Err(ManagerError::Core(CoreError::InvalidArgument(_))) => rejected += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!((applied, rejected), (1, 1));

    let stored = projects::get_project(&pool, owner.id, project.id)
        .await
        .unwrap();
    let end = stored.end_date.unwrap();
    assert!(end >= stored.start_date, "{} > {end}", stored.start_date);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cannot_touch_someone_elses_project(pool: PgPool) {
    let owner = common::user(&pool, "owner").await;
    let intruder = common::user(&pool, "intruder").await;
    let project = projects::create_project(&pool, owner.id, &new_project("Ajeno"))
        .await
        .unwrap();

    let read = projects::get_project(&pool, intruder.id, project.id).await;
    assert!(read.unwrap_err().is_not_found("project"));

    let write = projects::modify_project(
        &pool,
        intruder.id,
        project.id,
        &UpdateProject {
            name: Some("Robado".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(write.unwrap_err().is_not_found("project"));

    let unchanged = projects::get_project(&pool, owner.id, project.id)
        .await
        .unwrap();
    assert_eq!(unchanged.name, "Ajeno");
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recent_notifications_render_age(pool: PgPool) {
    let start = common::ledger_with(&pool, "reader", 100, AccountLevel::Beginner).await;
    ledger::credit(&pool, &start, 10, &PointChangeOptions::notify())
        .await
        .unwrap();
    ledger::debit(&pool, &start, 5, &PointChangeOptions::notify())
        .await
        .unwrap();

    let recent = notifications::recent_notifications(&pool, start.owner_id, 5)
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].notification.message, "Gastaste 5 puntos.");
    assert_eq!(recent[0].time_elapsed, "ahora");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_marking_notifications_read(pool: PgPool) {
    let start = common::ledger_with(&pool, "marker", 0, AccountLevel::Beginner).await;
    let first = ledger::credit(&pool, &start, 1, &PointChangeOptions::notify())
        .await
        .unwrap()
        .notification
        .unwrap();
    ledger::credit(&pool, &start, 2, &PointChangeOptions::notify())
        .await
        .unwrap();
    ledger::credit(&pool, &start, 3, &PointChangeOptions::notify())
        .await
        .unwrap();

    assert_eq!(notifications::unread_count(&pool, start.owner_id).await.unwrap(), 3);
    assert!(notifications::mark_read(&pool, start.owner_id, first.id)
        .await
        .unwrap());
    assert_eq!(notifications::unread_count(&pool, start.owner_id).await.unwrap(), 2);
    assert_eq!(notifications::mark_all_read(&pool, start.owner_id).await.unwrap(), 2);
    assert_eq!(notifications::unread_count(&pool, start.owner_id).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Overview and statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_overview_creates_ledger_and_limits_lists(pool: PgPool) {
    let owner = common::user(&pool, "visitor").await;
    for name in ["a", "b", "c", "d"] {
        projects::create_project(&pool, owner.id, &new_project(name))
            .await
            .unwrap();
    }

    let first_visit = overview::account_overview(&pool, owner.id, &OverviewLimits::default())
        .await
        .unwrap();
    assert_eq!(first_visit.ledger.points, 0);
    assert_eq!(first_visit.level_label, "Principiante");
    assert_eq!(first_visit.next_level, AccountLevel::Intermediate);
    assert_eq!(first_visit.points_for_next_level, 500);
    assert_eq!(first_visit.progress_percentage, 0.0);
    assert_eq!(first_visit.recent_projects.len(), 3);
    assert_eq!(first_visit.recent_projects[0].name, "d");
    assert!(first_visit.recent_notifications.is_empty());

    let ledger_row = first_visit.ledger;
    for amount in 1..=7 {
        ledger::credit(&pool, &ledger_row, amount, &PointChangeOptions::notify())
            .await
            .unwrap();
    }

    let limits = OverviewLimits {
        projects: 1,
        notifications: 5,
    };
    let later = overview::account_overview(&pool, owner.id, &limits)
        .await
        .unwrap();
    assert_eq!(later.ledger.id, ledger_row.id);
    assert_eq!(later.ledger.points, 28);
    assert_eq!(later.recent_projects.len(), 1);
    assert_eq!(later.recent_notifications.len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overview_serializes_level_lowercase(pool: PgPool) {
    let owner = common::user(&pool, "json").await;
    let view = overview::account_overview(&pool, owner.id, &OverviewLimits::default())
        .await
        .unwrap();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["ledger"]["level"], "beginner");
    assert_eq!(json["next_level"], "intermediate");
    assert_eq!(json["level_label"], "Principiante");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_statistics_for_staff(pool: PgPool) {
    let admin = common::staff(&pool, "admin").await;
    common::ledger_with(&pool, "rich", 12_000, AccountLevel::Master).await;
    common::ledger_with(&pool, "poor", 30, AccountLevel::Beginner).await;

    let stats = overview::admin_statistics(&pool, &admin).await.unwrap();
    assert_eq!(stats.users.total_users, 3);
    assert_eq!(stats.users.staff_users, 1);
    assert_eq!(stats.ledgers.total_ledgers, 2);
    assert_eq!(stats.ledgers.total_points, 12_030);
    assert_eq!(stats.levels.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_statistics_forbidden_for_regular_users(pool: PgPool) {
    let regular = common::user(&pool, "regular").await;
    assert_matches!(
        overview::admin_statistics(&pool, &regular).await,
        Err(ManagerError::Core(CoreError::Forbidden(_)))
    );
}

// ---------------------------------------------------------------------------
// User search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_users_paginates(pool: PgPool) {
    let admin = common::staff(&pool, "admin").await;
    for i in 0..12 {
        UserRepo::create(
            &pool,
            &CreateUser {
                username: format!("socio{i:02}"),
                first_name: Some("Socio".to_string()),
                last_name: Some(format!("Número {i}")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let config = common::config(10);

    let first = search::search_users(&pool, &config, &admin, "socio", None)
        .await
        .unwrap();
    assert_eq!(first.total, 12);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].username, "socio00");
    assert_eq!(first.items[0].full_name, "Socio Número 0");

    let second = search::search_users(&pool, &config, &admin, "SOCIO", Some("2"))
        .await
        .unwrap();
    assert_eq!(second.page, 2);
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[1].username, "socio11");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_blank_query_is_empty(pool: PgPool) {
    let admin = common::staff(&pool, "admin").await;

    let page = search::search_users(&pool, &common::config(10), &admin, "   ", Some("3"))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.page, 3);
    assert_eq!(page.per_page, 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_uses_configured_page_size(pool: PgPool) {
    let admin = common::staff(&pool, "admin").await;
    for i in 0..7 {
        common::user(&pool, &format!("vecino{i}")).await;
    }
    let config = common::config(3);

    let first = search::search_users(&pool, &config, &admin, "vecino", Some("nope"))
        .await
        .unwrap();
    assert_eq!(first.page, 1);
    assert_eq!(first.per_page, 3);
    assert_eq!(first.total, 7);
    assert_eq!(first.items.len(), 3);

    let last = search::search_users(&pool, &config, &admin, "vecino", Some("3"))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].username, "vecino6");

    let clamped = search::search_users(&pool, &config, &admin, "vecino", Some("-4"))
        .await
        .unwrap();
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.items[0].username, "vecino0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    let admin = common::staff(&pool, "admin").await;
    common::user(&pool, "ana_maria").await;
    common::user(&pool, "anaXmaria").await;

    let page = search::search_users(&pool, &common::config(10), &admin, "ana_", None)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].username, "ana_maria");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_forbidden_for_regular_users(pool: PgPool) {
    let regular = common::user(&pool, "curioso").await;
    assert_matches!(
        search::search_users(&pool, &common::config(10), &regular, "a", None).await,
        Err(ManagerError::Core(CoreError::Forbidden(_)))
    );
}
