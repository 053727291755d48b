//! # Shared Bus - Ledger Event Log
//!
//! Carries the observable ledger events to external indexers and UIs.
//!
//! ## Guarantees
//!
//! - **Ordered**: every published event receives the next sequence number,
//!   starting at 0, with no gaps.
//! - **Append-only**: the full history is retained, so a late or lagging
//!   consumer can backfill with [`InMemoryEventBus::history_since`].
//! - **Fan-out**: live subscribers receive events through a broadcast channel,
//!   optionally filtered by topic.
//!
//! ```text
//! ┌───────────────┐  publish()   ┌──────────────┐  subscribe()  ┌──────────┐
//! │ Ledger        │ ───────────→ │  Event Bus   │ ────────────→ │ Indexer  │
//! │ subsystems    │              │ [history]    │               │ / UI     │
//! └───────────────┘              └──────────────┘               └──────────┘
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent, SequencedEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before it starts lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
