//! Notification kinds, message templates and relative-time rendering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Points, Timestamp};

/// What happened to the point balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Credit,
    Debit,
}

impl NotificationKind {
    /// Storage representation, matching the `kind` CHECK constraint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Short headline for a point change of `amount`.
    pub fn message(self, amount: Points) -> String {
        match self {
            Self::Credit => format!("¡Felicitaciones! sumaste {amount} puntos."),
            Self::Debit => format!("Gastaste {amount} puntos."),
        }
    }

    /// Description used when the caller does not supply one.
    pub fn default_description(self) -> &'static str {
        match self {
            Self::Credit => "Se han añadido puntos a tu cuenta.",
            Self::Debit => "Se han restado puntos de tu cuenta.",
        }
    }

    /// The caller's description, or the default when it is missing or blank.
    pub fn description_or_default(self, description: Option<&str>) -> String {
        match description.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self.default_description().to_string(),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(CoreError::InvalidArgument(format!(
                "Unknown notification kind '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Relative time
// ---------------------------------------------------------------------------

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
/// Months are counted as 30 days.
const MONTH: i64 = 30 * DAY;
/// Years are counted as 365 days.
const YEAR: i64 = 365 * DAY;

/// Human-readable age of a notification, e.g. `"hace 5 minutos"`.
///
/// Anything younger than a minute (including timestamps slightly in the
/// future because of clock skew) renders as `"ahora"`.
pub fn time_elapsed(created_at: Timestamp, now: Timestamp) -> String {
    let seconds = (now - created_at).num_seconds();

    let (count, singular, plural) = if seconds < MINUTE {
        return "ahora".to_string();
    } else if seconds < HOUR {
        (seconds / MINUTE, "minuto", "minutos")
    } else if seconds < DAY {
        (seconds / HOUR, "hora", "horas")
    } else if seconds < MONTH {
        (seconds / DAY, "día", "días")
    } else if seconds < YEAR {
        (seconds / MONTH, "mes", "meses")
    } else {
        (seconds / YEAR, "año", "años")
    };

    let unit = if count == 1 { singular } else { plural };
    format!("hace {count} {unit}")
}
