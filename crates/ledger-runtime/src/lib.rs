//! # Cipher-Ledger Runtime Library
//!
//! Wires the ledger subsystems together and exposes the read-only query
//! surface. The `cipher-ledger` binary in `main.rs` drives a demonstration
//! flow on top of it.
//!
//! ## Modules
//!
//! - `container/` - [`LedgerConfig`] and the [`Ledger`] container
//! - `query` - [`LedgerQueryApi`], the read-only port
//! - `adapters/` - [`QueryHandler`], JSON access to the query port
//!
//! ## Example
//!
//! ```rust,ignore
//! let ledger = Ledger::new(LedgerConfig::from_env()?, Arc::new(LocalGateway::random()));
//! let (input, proof) = ledger.gateway().encrypt(5);
//! let id = ledger.messages().submit_message(alice, bob, input, proof).await?;
//! ```

pub mod adapters;
pub mod container;
pub mod query;

pub use adapters::{ApiQueryError, QueryHandler};
pub use container::{ConfigError, Ledger, LedgerConfig};
pub use query::LedgerQueryApi;
