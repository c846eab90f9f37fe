//! Domain logic for the manager subsystem.
//!
//! Everything here is pure: no database, no I/O. The `majoba-db` crate
//! persists these types and `majoba-manager` composes the two.

pub mod error;
pub mod leveling;
pub mod notification;
pub mod points;
pub mod search;
pub mod types;
