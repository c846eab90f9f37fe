//! Repository for the `manager_projects` table.
//!
//! Every lookup is scoped to an owner; a project belonging to someone
//! else is indistinguishable from a missing one.

use majoba_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, description, location, start_date, end_date, \
                       is_active, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project for `owner_id`, returning the created row.
    ///
    /// Missing `description`/`location` are stored as empty strings and a
    /// missing `is_active` defaults to `true`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO manager_projects
                (owner_id, name, description, location, start_date, end_date, is_active)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), $5, $6, COALESCE($7, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find one of the owner's projects.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM manager_projects WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Find one of the owner's projects and lock the row until the
    /// surrounding transaction ends.
    pub async fn lock_for_owner(
        executor: impl PgExecutor<'_>,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manager_projects WHERE id = $1 AND owner_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await
    }

    /// List the owner's projects, most recently created first.
    ///
    /// `limit = None` returns all of them.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manager_projects
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Update one of the owner's projects. Only non-`None` fields in `input`
    /// are applied; `end_date: Some(None)` stores `NULL`.
    ///
    /// Returns `None` if the owner has no project with the given `id`.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        owner_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE manager_projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                location = COALESCE($5, location),
                start_date = COALESCE($6, start_date),
                end_date = CASE WHEN $9 THEN NULL ELSE COALESCE($7, end_date) END,
                is_active = COALESCE($8, is_active)
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(input.start_date)
            .bind(input.end_date.flatten())
            .bind(input.is_active)
            .bind(input.clears_end_date())
            .fetch_optional(executor)
            .await
    }
}
