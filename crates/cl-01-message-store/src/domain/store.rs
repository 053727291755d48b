//! Message table and per-party index.

use shared_types::{
    CiphertextHandle, FilterId, LedgerError, Message, MessageId, PartyId, Timestamp,
};
use std::collections::HashMap;

/// Append-only message table.
///
/// The next id is always `messages.len()`, so allocation and insertion are a
/// single step and ids stay dense from 0.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    by_party: HashMap<PartyId, Vec<MessageId>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages allocated.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.messages.len() as u64
    }

    /// Allocate the next id, store the message in `Created` state and index
    /// it under both parties.
    ///
    /// A self-addressed message is indexed twice for its party, once per role.
    pub fn insert(
        &mut self,
        sender: PartyId,
        receiver: PartyId,
        content: CiphertextHandle,
        created_at: Timestamp,
    ) -> MessageId {
        let id = MessageId(self.count());
        self.messages
            .push(Message::new(id, sender, receiver, content, created_at));
        self.by_party.entry(sender).or_default().push(id);
        self.by_party.entry(receiver).or_default().push(id);
        id
    }

    pub fn get(&self, id: MessageId) -> Result<&Message, LedgerError> {
        self.messages
            .get(Self::index(id))
            .ok_or_else(|| LedgerError::MessageNotFound {
                id,
                count: self.count(),
            })
    }

    /// Record a disclosed filter result. Write-once per message.
    pub fn mark_filtered(
        &mut self,
        id: MessageId,
        filter_id: FilterId,
        result: u64,
    ) -> Result<(), LedgerError> {
        let count = self.count();
        self.messages
            .get_mut(Self::index(id))
            .ok_or(LedgerError::MessageNotFound { id, count })?
            .mark_filtered(filter_id, result)
    }

    /// Ids of messages where `party` is sender or receiver, in creation order.
    #[must_use]
    pub fn user_messages(&self, party: &PartyId) -> Vec<MessageId> {
        self.by_party.get(party).cloned().unwrap_or_default()
    }

    fn index(id: MessageId) -> usize {
        usize::try_from(id.as_u64()).unwrap_or(usize::MAX)
    }
}
