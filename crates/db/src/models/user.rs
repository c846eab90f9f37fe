//! User entity model and DTOs.
//!
//! Accounts are owned by the authentication layer; the manager only needs
//! to create them (tests, provisioning), look them up and search them.

use majoba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub profession: String,
    pub direction: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// "First Last" when both names are set, otherwise the username.
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if !first.is_empty() && !last.is_empty() {
            format!("{first} {last}")
        } else {
            self.username.clone()
        }
    }
}

/// One user search hit.
#[derive(Debug, Clone, Serialize)]
pub struct UserSearchHit {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
}

impl From<&User> for UserSearchHit {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
            is_staff: user.is_staff,
            is_active: user.is_active,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    /// Defaults to `false` if omitted.
    pub is_staff: Option<bool>,
}
