//! Ports layer for the Filter Application Engine.

pub mod inbound;
pub mod outbound;

pub use inbound::FilterEngineApi;
pub use outbound::{CiphertextGateway, EventPublisher};
