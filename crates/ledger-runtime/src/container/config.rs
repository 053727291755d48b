//! # Ledger Configuration
//!
//! Unified configuration for the three subsystems, the event bus and
//! telemetry.
//!
//! Every value has a default; `from_env` overrides them from `CL_*`
//! variables and `validate` rejects settings the ledger cannot run with.

use std::time::Duration;

use cl_02_filter_registry::{RegistryConfig, ToggleAuthorization};
use cl_03_filter_engine::{ApplyAuthorization, EngineConfig};
use ledger_telemetry::TelemetryConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use thiserror::Error;

/// Complete ledger configuration.
#[derive(Debug, Clone, Default)]
pub struct LedgerConfig {
    /// Filter engine configuration.
    pub engine: EngineSettings,
    /// Who may toggle and apply filters.
    pub authorization: AuthorizationConfig,
    /// Event bus configuration.
    pub bus: BusConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

/// Filter engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on a single disclosure.
    pub disclosure_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            disclosure_timeout: EngineConfig::default().disclosure_timeout,
        }
    }
}

/// Authorization policies. Both default to open access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorizationConfig {
    pub toggle: ToggleAuthorization,
    pub apply: ApplyAuthorization,
}

/// Event bus configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Events buffered per live subscriber before it lags.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A zero disclosure timeout would fail every application.
    #[error("Disclosure timeout must be greater than zero")]
    ZeroDisclosureTimeout,

    /// The broadcast channel needs room for at least one event.
    #[error("Event bus capacity must be greater than zero")]
    ZeroBusCapacity,
}

impl LedgerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `CL_DISCLOSURE_TIMEOUT_MS`: disclosure bound in ms (default: 30000)
    /// - `CL_TOGGLE_AUTH`: `anyone` | `creator` (default: anyone)
    /// - `CL_APPLY_AUTH`: `anyone` | `receiver` (default: anyone)
    /// - `CL_EVENT_BUS_CAPACITY`: per-subscriber buffer (default: 1000)
    /// - telemetry variables, see [`TelemetryConfig::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|var| std::env::var(var).ok())?;
        config.telemetry = TelemetryConfig::from_env();
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Telemetry is left at its defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("CL_DISCLOSURE_TIMEOUT_MS") {
            let millis: u64 = parse_var("CL_DISCLOSURE_TIMEOUT_MS", &value)?;
            config.engine.disclosure_timeout = Duration::from_millis(millis);
        }
        if let Some(value) = lookup("CL_TOGGLE_AUTH") {
            config.authorization.toggle = parse_var("CL_TOGGLE_AUTH", &value)?;
        }
        if let Some(value) = lookup("CL_APPLY_AUTH") {
            config.authorization.apply = parse_var("CL_APPLY_AUTH", &value)?;
        }
        if let Some(value) = lookup("CL_EVENT_BUS_CAPACITY") {
            config.bus.capacity = parse_var("CL_EVENT_BUS_CAPACITY", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the ledger cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.disclosure_timeout.is_zero() {
            return Err(ConfigError::ZeroDisclosureTimeout);
        }
        if self.bus.capacity == 0 {
            return Err(ConfigError::ZeroBusCapacity);
        }
        Ok(())
    }

    /// Filter engine view of this configuration.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            disclosure_timeout: self.engine.disclosure_timeout,
            apply_authorization: self.authorization.apply,
        }
    }

    /// Filter registry view of this configuration.
    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            toggle_authorization: self.authorization.toggle,
        }
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
