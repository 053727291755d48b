//! Who may toggle a filter.

use shared_types::{FilterRule, LedgerError, PartyId};
use std::fmt;
use std::str::FromStr;

/// Toggle authorization policy.
///
/// `Anyone` is the default and matches the ledger's historical behavior:
/// toggling is currently unauthenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleAuthorization {
    #[default]
    Anyone,
    /// Only the filter's creator may toggle it.
    CreatorOnly,
}

impl ToggleAuthorization {
    pub fn check(&self, caller: &PartyId, rule: &FilterRule) -> Result<(), LedgerError> {
        match self {
            Self::Anyone => Ok(()),
            Self::CreatorOnly if *caller == rule.creator => Ok(()),
            Self::CreatorOnly => Err(LedgerError::Unauthorized {
                caller: *caller,
                operation: "toggle_filter",
            }),
        }
    }
}

impl fmt::Display for ToggleAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anyone => write!(f, "anyone"),
            Self::CreatorOnly => write!(f, "creator"),
        }
    }
}

impl FromStr for ToggleAuthorization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anyone" => Ok(Self::Anyone),
            "creator" | "creator_only" => Ok(Self::CreatorOnly),
            other => Err(format!(
                "unknown toggle policy '{}' (expected anyone|creator)",
                other
            )),
        }
    }
}
