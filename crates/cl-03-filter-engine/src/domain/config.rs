//! Engine configuration.

use std::time::Duration;

use super::ApplyAuthorization;

/// Default bound on how long a disclosure may take.
pub const DEFAULT_DISCLOSURE_TIMEOUT: Duration = Duration::from_secs(30);

/// Filter engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on waiting for the gateway to disclose a result.
    pub disclosure_timeout: Duration,
    /// Who may apply a filter to a message.
    pub apply_authorization: ApplyAuthorization,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            disclosure_timeout: DEFAULT_DISCLOSURE_TIMEOUT,
            apply_authorization: ApplyAuthorization::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_disclosure_timeout(mut self, timeout: Duration) -> Self {
        self.disclosure_timeout = timeout;
        self
    }
}
