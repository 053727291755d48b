//! Outbound Ports (Driven Ports)
//!
//! The Message Store depends on three collaborators, all defined in shared
//! crates so the other subsystems use the same contracts:
//!
//! - [`CiphertextGateway`]: validates submitted ciphertext and holds it
//! - [`EventPublisher`]: the ordered ledger event log
//! - [`TimeSource`]: creation timestamps

pub use cl_ciphertext_gateway::CiphertextGateway;
pub use shared_bus::EventPublisher;
pub use shared_types::TimeSource;
