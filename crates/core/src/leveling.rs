//! Account levels and the point thresholds that define them.
//!
//! A level is derived from the cumulative point balance, but the stored
//! level only changes when it is explicitly recomputed. Progress helpers
//! therefore work from the *stored* level, not from the balance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Points;

// ---------------------------------------------------------------------------
// Level enum
// ---------------------------------------------------------------------------

/// Ordered account tiers, lowest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
    Master,
}

/// All levels in ascending order.
pub const ALL_LEVELS: [AccountLevel; 5] = [
    AccountLevel::Beginner,
    AccountLevel::Intermediate,
    AccountLevel::Advanced,
    AccountLevel::Expert,
    AccountLevel::Master,
];

impl AccountLevel {
    /// Storage representation, matching the `level` CHECK constraint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }

    /// Label shown to account owners.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Beginner => "Principiante",
            Self::Intermediate => "Intermedio",
            Self::Advanced => "Avanzado",
            Self::Expert => "Experto",
            Self::Master => "Maestro",
        }
    }

    /// Cumulative points needed to reach this level.
    pub fn lower_bound(self) -> Points {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 500,
            Self::Advanced => 2_000,
            Self::Expert => 5_000,
            Self::Master => 10_000,
        }
    }

    /// Exclusive upper bound of this level's range. `None` for the top level.
    pub fn upper_bound(self) -> Option<Points> {
        self.successor().map(Self::lower_bound)
    }

    /// The level after this one. The top level saturates.
    pub fn next(self) -> Self {
        self.successor().unwrap_or(self)
    }

    fn successor(self) -> Option<Self> {
        match self {
            Self::Beginner => Some(Self::Intermediate),
            Self::Intermediate => Some(Self::Advanced),
            Self::Advanced => Some(Self::Expert),
            Self::Expert => Some(Self::Master),
            Self::Master => None,
        }
    }

    /// Highest level whose lower bound is met by `points`.
    pub fn for_points(points: Points) -> Self {
        ALL_LEVELS
            .iter()
            .rev()
            .copied()
            .find(|level| points >= level.lower_bound())
            .unwrap_or(Self::Beginner)
    }
}

impl fmt::Display for AccountLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!(
                    "Unknown account level '{s}'. Must be one of: {:?}",
                    ALL_LEVELS.map(AccountLevel::as_str)
                ))
            })
    }
}

impl TryFrom<String> for AccountLevel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Points still missing to reach the level after `level`, floored at zero.
///
/// Returns 0 at the top level.
pub fn points_for_next_level(level: AccountLevel, points: Points) -> Points {
    match level.upper_bound() {
        Some(threshold) => (threshold - points).max(0),
        None => 0,
    }
}

/// Progress through `level`'s point range as a percentage in `[0, 100]`.
///
/// The top level has no upper bound and always reports 100.
pub fn progress_percentage(level: AccountLevel, points: Points) -> f64 {
    let Some(upper) = level.upper_bound() else {
        return 100.0;
    };
    let lower = level.lower_bound();
    let progress = (points - lower) as f64 / (upper - lower) as f64 * 100.0;
    progress.clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
