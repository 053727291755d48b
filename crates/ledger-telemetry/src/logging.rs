//! Structured logging.
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either a
//! JSON layer (containers, log shippers) or a human-readable fmt layer.
//! JSON lines carry:
//! - `timestamp`: ISO 8601 timestamp
//! - `level`: Log level
//! - `target`: Emitting module
//! - `fields`: Structured context (`subsystem`, `message_id`, ...)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber described by `config`.
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level '{}': {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => {
            let json_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);
            registry.with(json_layer).try_init()
        }
        (true, false) => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true);
            registry.with(fmt_layer).try_init()
        }
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

/// Log a message-related event with standard fields.
#[macro_export]
macro_rules! log_message_event {
    ($level:ident, $subsystem:expr, $msg:expr, $message_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            message_id = %$message_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a filter-related event with standard fields.
#[macro_export]
macro_rules! log_filter_event {
    ($level:ident, $subsystem:expr, $msg:expr, $filter_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            filter_id = %$filter_id,
            $($($field)*,)?
            $msg
        )
    };
}
