//! Domain layer for the Filter Application Engine.

mod config;
mod policy;
mod validation;

pub use config::{EngineConfig, DEFAULT_DISCLOSURE_TIMEOUT};
pub use policy::ApplyAuthorization;
pub use validation::{check_applicable, Applicable};
