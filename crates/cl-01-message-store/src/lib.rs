//! # CL-01 Message Store
//!
//! Stores encrypted messages and indexes them by party.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): `MessageStore`, the append-only table and
//!   per-party index
//! - **Ports Layer** (`ports/`): `MessageStoreApi` (driving) and the gateway,
//!   event and time contracts it is driven by
//! - **Service Layer** (`service`): `MessageService`, which implements
//!   `MessageStoreApi`
//!
//! ## Invariants
//!
//! - Message ids are dense from 0 and never reused.
//! - A message is indexed once per role it holds (sender, receiver).
//! - `filtered` goes false → true at most once; `filter_result` is write-once.
//! - A rejected ciphertext allocates no id and emits no event.
//!
//! ## Usage Example
//!
//! ```ignore
//! use cl_01_message_store::{MessageService, MessageStoreApi};
//!
//! let service = MessageService::new(gateway, bus, Arc::new(SystemTimeSource));
//! let id = service.submit_message(alice, bob, input, proof).await?;
//! assert_eq!(service.get_user_messages(bob).await, vec![id]);
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::MessageStore;
pub use ports::MessageStoreApi;
pub use service::MessageService;
