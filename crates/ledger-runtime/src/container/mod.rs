//! # Ledger Container
//!
//! Configuration and dependency wiring for the ledger subsystems.

pub mod config;
pub mod subsystems;

pub use config::{AuthorizationConfig, BusConfig, ConfigError, EngineSettings, LedgerConfig};
pub use subsystems::Ledger;
