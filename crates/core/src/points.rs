//! Point amounts and the options accepted by credit/debit operations.

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Points;

/// Options for a single credit or debit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointChangeOptions {
    /// Record a notification for the account owner.
    #[serde(default)]
    pub notify: bool,
    /// Notification detail. Blank or missing falls back to the kind's default.
    pub description: Option<String>,
}

impl PointChangeOptions {
    /// Options that record a notification with the default description.
    pub fn notify() -> Self {
        Self {
            notify: true,
            description: None,
        }
    }

    /// Attach a notification description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Whether `amount` leads to a real mutation.
///
/// Zero and negative amounts are silent no-ops, not errors.
pub fn is_effective_amount(amount: Points) -> bool {
    amount > 0
}

/// Parse a raw amount as submitted by a collaborator (e.g. a form field).
///
/// Surrounding whitespace is ignored. Anything that is not a base-10
/// integer fitting in [`Points`] is rejected. Non-positive values parse
/// successfully; the ledger treats them as no-ops.
pub fn parse_amount(raw: &str) -> Result<Points, CoreError> {
    let trimmed = raw.trim();
    trimmed.parse::<Points>().map_err(|_| {
        CoreError::InvalidArgument(format!("Point amount '{trimmed}' is not a valid integer"))
    })
}
