//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, phone, profession, \
                       direction, is_staff, is_active, created_at, updated_at";

/// Case-insensitive match on username, first name or last name.
///
/// `$1` is an already-escaped `ILIKE` pattern.
const SEARCH_FILTER: &str = "username ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name, is_staff)
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, ''), COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.is_staff)
            .fetch_one(pool)
            .await
    }


    /// Users matching `pattern`, ordered by username.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE {SEARCH_FILTER}
             ORDER BY username
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of users matching `pattern`.
    pub async fn count_search(pool: &PgPool, pattern: &str) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM users WHERE {SEARCH_FILTER}");
        let row: (i64,) = sqlx::query_as(&query).bind(pattern).fetch_one(pool).await?;
        Ok(row.0)
    }
}
