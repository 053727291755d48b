//! Gateway backends
//!
//! The local backend is a keyed test double with no real homomorphic
//! security. The oracle backend wraps any other gateway and serves
//! disclosure through an asynchronous request queue.

#[cfg(feature = "local")]
pub mod local;

pub mod oracle;
