//! Read-only query surface over the wired ledger.

use async_trait::async_trait;
use shared_bus::SequencedEvent;
use shared_types::{FilterId, FilterRule, LedgerError, Message, MessageId, PartyId};

/// Read-only ledger queries for indexers, UIs and the JSON adapter.
#[async_trait]
pub trait LedgerQueryApi: Send + Sync {
    /// # Errors
    ///
    /// `MessageNotFound` for an unallocated id.
    async fn get_message(&self, id: MessageId) -> Result<Message, LedgerError>;

    /// # Errors
    ///
    /// `FilterNotFound` for an unallocated id.
    async fn get_filter(&self, id: FilterId) -> Result<FilterRule, LedgerError>;

    /// Message ids where `party` is sender or receiver, in creation order.
    async fn get_user_messages(&self, party: PartyId) -> Vec<MessageId>;

    /// Filter ids registered by `creator`, in creation order.
    async fn get_user_filters(&self, creator: PartyId) -> Vec<FilterId>;

    async fn message_count(&self) -> u64;

    async fn filter_count(&self) -> u64;

    /// # Errors
    ///
    /// `FilterNotFound` for an unallocated id.
    async fn is_filter_active(&self, id: FilterId) -> Result<bool, LedgerError>;

    /// Event log entries with sequence number `>= sequence`.
    async fn events_since(&self, sequence: u64) -> Vec<SequencedEvent>;
}
