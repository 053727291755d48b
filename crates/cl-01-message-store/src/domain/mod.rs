//! Domain layer for the Message Store.
//!
//! Pure data structures; no I/O and no locking. The service wraps
//! [`MessageStore`] in a lock and talks to the gateway.

mod store;

pub use store::MessageStore;
