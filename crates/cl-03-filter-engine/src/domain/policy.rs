//! Who may apply a filter to a message.

use shared_types::{LedgerError, Message, PartyId};
use std::fmt;
use std::str::FromStr;

/// Apply authorization policy.
///
/// `Anyone` is the default: applying a filter is currently unauthenticated,
/// any party may request the test on any message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyAuthorization {
    #[default]
    Anyone,
    /// Only the message's receiver may filter it.
    ReceiverOnly,
}

impl ApplyAuthorization {
    pub fn check(&self, caller: &PartyId, message: &Message) -> Result<(), LedgerError> {
        match self {
            Self::Anyone => Ok(()),
            Self::ReceiverOnly if *caller == message.receiver => Ok(()),
            Self::ReceiverOnly => Err(LedgerError::Unauthorized {
                caller: *caller,
                operation: "apply_filter",
            }),
        }
    }
}

impl fmt::Display for ApplyAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anyone => write!(f, "anyone"),
            Self::ReceiverOnly => write!(f, "receiver"),
        }
    }
}

impl FromStr for ApplyAuthorization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anyone" => Ok(Self::Anyone),
            "receiver" | "receiver_only" => Ok(Self::ReceiverOnly),
            other => Err(format!(
                "unknown apply policy '{}' (expected anyone|receiver)",
                other
            )),
        }
    }
}
