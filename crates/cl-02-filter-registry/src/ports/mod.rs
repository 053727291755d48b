//! Ports layer for the Filter Registry.

pub mod inbound;
pub mod outbound;

pub use inbound::FilterRegistryApi;
pub use outbound::{CiphertextGateway, EventPublisher, TimeSource};
