//! # Shared Types Crate
//!
//! This crate contains the identities, ledger records and error kinds used by
//! every ledger subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Opaque Ciphertext**: Records only ever hold a [`CiphertextHandle`];
//!   ciphertext material stays inside the gateway.
//! - **Write-Once Results**: A [`Message`] guards its own `Created → Filtered`
//!   transition, so no caller can overwrite a disclosed result.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{FixedTimeSource, SystemTimeSource, TimeSource};
