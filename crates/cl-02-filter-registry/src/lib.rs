//! # CL-02 Filter Registry
//!
//! Registers encrypted keyword patterns, indexes them by creator and tracks
//! whether each filter is active.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `FilterRegistry` table and the
//!   `ToggleAuthorization` policy
//! - **Ports Layer** (`ports/`): `FilterRegistryApi` (driving) and the
//!   gateway, event and time contracts
//! - **Service Layer** (`service`): `FilterService`
//!
//! ## Invariants
//!
//! - Filter ids are dense from 0 and independent of message ids.
//! - New filters are active; an even number of toggles restores the state.
//! - Toggling never touches messages that were already filtered.
//!
//! ## Authorization
//!
//! By default anyone may toggle any filter (currently unauthenticated).
//! `RegistryConfig::toggle_authorization` restricts it to the creator.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{FilterRegistry, ToggleAuthorization};
pub use ports::FilterRegistryApi;
pub use service::{FilterService, RegistryConfig};
