//! Outbound Ports (Driven Ports)
//!
//! Same collaborators as the Message Store: the ciphertext gateway, the
//! ledger event log and a time source.

pub use cl_ciphertext_gateway::CiphertextGateway;
pub use shared_bus::EventPublisher;
pub use shared_types::TimeSource;
