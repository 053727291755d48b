//! # Event Publisher
//!
//! Defines the publishing side of the event bus.

use crate::events::{EventFilter, LedgerEvent, SequencedEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

/// Trait for publishing events to the bus.
///
/// Subsystems call this while still holding the lock that guarded the
/// mutation being announced, so log order matches mutation order.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Append an event to the log and fan it out to live subscribers.
    ///
    /// # Returns
    ///
    /// The sequence number assigned to the event.
    async fn publish(&self, event: LedgerEvent) -> u64;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the event bus.
///
/// Uses `tokio::sync::broadcast` for live fan-out and keeps the complete
/// history for backfill. Suitable for single-node operation.
pub struct InMemoryEventBus {
    /// Broadcast sender for live subscribers.
    sender: broadcast::Sender<SequencedEvent>,

    /// Append-only event history. Its length is the next sequence number.
    history: Mutex<Vec<SequencedEvent>>,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            history: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Only events published after this call are delivered; use
    /// [`history_since`](Self::history_since) for earlier ones.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Get a stream of events matching a filter.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// All events with `sequence >= from`, in order.
    #[must_use]
    pub fn history_since(&self, from: u64) -> Vec<SequencedEvent> {
        let history = self.history.lock();
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(history.len());
        history[start..].to_vec()
    }

    /// The full event history.
    #[must_use]
    pub fn history(&self) -> Vec<SequencedEvent> {
        self.history_since(0)
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LedgerEvent) -> u64 {
        let topic = event.topic();

        // Sequence assignment, history append and broadcast happen under one
        // lock so live subscribers observe the same order as the history.
        let mut history = self.history.lock();
        let sequence = history.len() as u64;
        let sequenced = SequencedEvent { sequence, event };
        history.push(sequenced.clone());

        match self.sender.send(sequenced) {
            Ok(receivers) => {
                debug!(sequence, topic = ?topic, receivers, "Event published");
            }
            Err(_) => {
                // No live receivers; the event is still in the history.
                debug!(sequence, topic = ?topic, "Event logged (no live subscribers)");
            }
        }

        sequence
    }

    fn events_published(&self) -> u64 {
        self.history.lock().len() as u64
    }
}
