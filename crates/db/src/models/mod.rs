//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the entity is writable

pub mod dashboard;
pub mod ledger;
pub mod notification;
pub mod project;
pub mod user;
