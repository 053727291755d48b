//! # Ledger Telemetry
//!
//! Observability for Cipher-Ledger.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with JSON or pretty output
//! - **Metrics**: Prometheus counters, gauges and histograms in a private
//!   registry, rendered with [`gather_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(&TelemetryConfig::from_env())?;
//!     // Logs and metrics are now being collected
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CL_SERVICE_NAME` | `cipher-ledger` | Service name in logs |
//! | `CL_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `CL_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `CL_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_metrics, record_disclosure, record_filter_applied, record_filter_created,
    record_filter_toggled, record_message_submitted, record_rejection, register_metrics,
    DISCLOSURE_DURATION, FILTERS_APPLIED, FILTERS_CREATED, FILTER_TOGGLES,
    MESSAGES_SUBMITTED, REJECTED_OPERATIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to encode Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics();
    init_logging(config)?;

    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Guard that keeps telemetry active. Logs shutdown when dropped.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
