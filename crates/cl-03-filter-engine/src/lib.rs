//! # CL-03 Filter Application Engine
//!
//! Tests an encrypted message against an encrypted filter pattern without
//! decrypting either, discloses the single equality bit and records it on
//! the message.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `EngineConfig`, the `ApplyAuthorization`
//!   policy and the shared pre-condition check
//! - **Ports Layer** (`ports/`): `FilterEngineApi` (driving) and the
//!   gateway and event contracts
//! - **Service Layer** (`service`): `FilterEngine`, operating directly on
//!   the lock handles of the Message Store and Filter Registry
//!
//! ## Invariants
//!
//! - A message is filtered at most once; the first persisted result wins.
//! - Only active filters are applied.
//! - No lock is held while waiting on the gateway.
//! - A failed, timed out or cancelled application leaves the message
//!   unfiltered and emits no event.
//!
//! ## Lock Order
//!
//! Message store before filter registry, never the reverse.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{ApplyAuthorization, EngineConfig, DEFAULT_DISCLOSURE_TIMEOUT};
pub use ports::FilterEngineApi;
pub use service::FilterEngine;
