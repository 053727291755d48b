//! Inbound Ports (Driving Ports)
//!
//! The API that clients and the other subsystems use to reach the
//! Message Store.

use async_trait::async_trait;
use shared_types::{CiphertextInput, InputProof, LedgerError, Message, MessageId, PartyId};

/// Primary Message Store API (Driving Port)
#[async_trait]
pub trait MessageStoreApi: Send + Sync {
    /// Deposit an encrypted message from `sender` to `receiver`.
    ///
    /// # Errors
    ///
    /// `InvalidCiphertext` if the gateway rejects the input. Nothing is
    /// allocated or indexed in that case.
    async fn submit_message(
        &self,
        sender: PartyId,
        receiver: PartyId,
        input: CiphertextInput,
        proof: InputProof,
    ) -> Result<MessageId, LedgerError>;

    /// Snapshot of a stored message.
    ///
    /// # Errors
    ///
    /// `MessageNotFound` if `id >= message_count()`.
    async fn get_message(&self, id: MessageId) -> Result<Message, LedgerError>;

    /// Message ids where `party` is sender or receiver, in creation order.
    /// Possibly empty.
    async fn get_user_messages(&self, party: PartyId) -> Vec<MessageId>;

    /// Number of messages allocated so far.
    async fn message_count(&self) -> u64;
}
