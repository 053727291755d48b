//! Outbound Ports (Driven Ports)
//!
//! The engine computes and discloses through the ciphertext gateway and
//! announces results on the ledger event log. Message and filter state is
//! reached through the lock handles of the two stores, not through a port.

pub use cl_ciphertext_gateway::CiphertextGateway;
pub use shared_bus::EventPublisher;
