//! Ports layer for the Message Store.
//!
//! - `inbound`: the API this subsystem offers
//! - `outbound`: what it needs from the outside

pub mod inbound;
pub mod outbound;

pub use inbound::MessageStoreApi;
pub use outbound::{CiphertextGateway, EventPublisher, TimeSource};
