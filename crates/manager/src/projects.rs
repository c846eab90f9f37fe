//! Owner-scoped project records.

use chrono::NaiveDate;
use majoba_core::error::CoreError;
use majoba_core::types::DbId;
use majoba_db::models::project::{CreateProject, Project, UpdateProject};
use majoba_db::repositories::ProjectRepo;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{ManagerError, ManagerResult};

fn project_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "project",
        id,
    }
}

fn check_date_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::InvalidArgument(format!(
            "Project end date {end} is before its start date {start}"
        ))),
        _ => Ok(()),
    }
}

/// Create a project owned by `owner_id`.
#[tracing::instrument(skip(pool, input), fields(name = %input.name))]
pub async fn create_project(
    pool: &PgPool,
    owner_id: DbId,
    input: &CreateProject,
) -> ManagerResult<Project> {
    input.validate()?;
    check_date_range(input.start_date, input.end_date)?;

    let project = ProjectRepo::create(pool, owner_id, input)
        .await
        .map_err(|e| ManagerError::from_owner_write(e, owner_id))?;
    tracing::info!(project_id = project.id, "Project created");
    Ok(project)
}

/// All of the owner's projects, newest first.
pub async fn list_projects(pool: &PgPool, owner_id: DbId) -> ManagerResult<Vec<Project>> {
    Ok(ProjectRepo::list_for_owner(pool, owner_id, None).await?)
}

/// One of the owner's projects. Someone else's project is `NotFound`.
pub async fn get_project(pool: &PgPool, owner_id: DbId, project_id: DbId) -> ManagerResult<Project> {
    ProjectRepo::find_for_owner(pool, project_id, owner_id)
        .await?
        .ok_or_else(|| project_not_found(project_id).into())
}

/// Apply a partial update to one of the owner's projects.
///
/// The row is locked while the merged date range is checked, so concurrent
/// edits cannot combine into an end date before the start date.
#[tracing::instrument(skip(pool, input))]
pub async fn modify_project(
    pool: &PgPool,
    owner_id: DbId,
    project_id: DbId,
    input: &UpdateProject,
) -> ManagerResult<Project> {
    input.validate()?;

    let mut tx = pool.begin().await?;

    let existing = ProjectRepo::lock_for_owner(&mut *tx, project_id, owner_id)
        .await?
        .ok_or_else(|| project_not_found(project_id))?;
    let (start, end) = input.merged_dates(&existing);
    check_date_range(start, end)?;

    let project = ProjectRepo::update(&mut *tx, project_id, owner_id, input)
        .await?
        .ok_or_else(|| project_not_found(project_id))?;
    tx.commit().await?;

    tracing::info!("Project modified");
    Ok(project)
}
