//! # Ledger Events
//!
//! Defines all event types that flow through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::entities::{FilterId, MessageId, PartyId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // SUBSYSTEM 1: MESSAGE STORE
    // =========================================================================
    /// A message was stored and indexed for both parties.
    MessageCreated {
        id: MessageId,
        sender: PartyId,
        receiver: PartyId,
    },

    // =========================================================================
    // SUBSYSTEM 2: FILTER REGISTRY
    // =========================================================================
    /// A filter rule was registered (active).
    FilterCreated { id: FilterId, creator: PartyId },

    // =========================================================================
    // SUBSYSTEM 3: FILTER ENGINE
    // =========================================================================
    /// A filter was applied to a message and the result disclosed.
    FilterApplied {
        message_id: MessageId,
        filter_id: FilterId,
        result: u64,
    },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::MessageCreated { .. } => EventTopic::Messages,
            Self::FilterCreated { .. } => EventTopic::Filters,
            Self::FilterApplied { .. } => EventTopic::FilterApplication,
        }
    }
}

/// An event together with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    /// Position in the log, dense from 0.
    pub sequence: u64,
    pub event: LedgerEvent,
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Subsystem 1 events.
    Messages,
    /// Subsystem 2 events.
    Filters,
    /// Subsystem 3 events.
    FilterApplication,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
