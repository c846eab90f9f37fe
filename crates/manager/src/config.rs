use std::str::FromStr;
use std::time::Duration;

use majoba_core::search::DEFAULT_PER_PAGE;
use majoba_db::PoolSettings;

use crate::error::{ManagerError, ManagerResult};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// How many recent items the account overview shows.
#[derive(Debug, Clone, Copy)]
pub struct OverviewLimits {
    pub projects: i64,
    pub notifications: i64,
}

impl Default for OverviewLimits {
    fn default() -> Self {
        Self {
            projects: 3,
            notifications: 5,
        }
    }
}

/// Manager configuration loaded from environment variables.
///
/// Everything except the database URL has a default suitable for local
/// development. The config is passed explicitly to whatever needs it.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub database_url: String,
    /// Pool size (default: `20`).
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection (default: `5`).
    pub acquire_timeout_secs: u64,
    /// User search page size (default: `10`).
    pub search_page_size: i64,
    pub overview: OverviewLimits,
    pub log_format: LogFormat,
}

impl ManagerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default    |
    /// |------------------------------|------------|
    /// | `DATABASE_URL`               | required   |
    /// | `DB_MAX_CONNECTIONS`         | `20`       |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`    | `5`        |
    /// | `SEARCH_PAGE_SIZE`           | `10`       |
    /// | `RECENT_PROJECTS_LIMIT`      | `3`        |
    /// | `RECENT_NOTIFICATIONS_LIMIT` | `5`        |
    /// | `LOG_FORMAT`                 | `pretty`   |
    pub fn from_env() -> ManagerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ManagerResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ManagerError::Config("DATABASE_URL must be set".into()))?;

        let defaults = OverviewLimits::default();

        Ok(Self {
            database_url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            acquire_timeout_secs: parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            search_page_size: positive_or(&lookup, "SEARCH_PAGE_SIZE", DEFAULT_PER_PAGE)?,
            overview: OverviewLimits {
                projects: positive_or(&lookup, "RECENT_PROJECTS_LIMIT", defaults.projects)?,
                notifications: positive_or(
                    &lookup,
                    "RECENT_NOTIFICATIONS_LIMIT",
                    defaults.notifications,
                )?,
            },
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
        })
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> ManagerResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ManagerError::Config(format!("{key} is invalid ({raw:?}): {e}"))),
    }
}

fn positive_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: i64,
) -> ManagerResult<i64> {
    let value: i64 = parse_or(lookup, key, default)?;
    if value < 1 {
        return Err(ManagerError::Config(format!(
            "{key} must be at least 1, got {value}"
        )));
    }
    Ok(value)
}
