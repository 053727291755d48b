//! # Message Store Service
//!
//! Implements [`MessageStoreApi`] over a lock-guarded [`MessageStore`].
//!
//! ## Submission Path
//!
//! 1. Gateway validates the ciphertext and grants compute/disclose (no lock held)
//! 2. Under the write lock: allocate id, store, index, publish `MessageCreated`
//!
//! Step 2 is a single critical section, so ids, index order and event order
//! always agree.

use async_trait::async_trait;
use cl_ciphertext_gateway::admit;
use ledger_telemetry::{log_message_event, record_message_submitted, record_rejection};
use shared_bus::LedgerEvent;
use shared_types::{CiphertextInput, InputProof, LedgerError, Message, MessageId, PartyId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use crate::domain::MessageStore;
use crate::ports::{CiphertextGateway, EventPublisher, MessageStoreApi, TimeSource};

/// Subsystem label used in logs.
pub const SUBSYSTEM: &str = "message-store";

/// Message Store service.
pub struct MessageService<G: ?Sized> {
    store: Arc<RwLock<MessageStore>>,
    gateway: Arc<G>,
    events: Arc<dyn EventPublisher>,
    time: Arc<dyn TimeSource>,
}

impl<G: CiphertextGateway + ?Sized> MessageService<G> {
    pub fn new(
        gateway: Arc<G>,
        events: Arc<dyn EventPublisher>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            store: Arc::new(RwLock::new(MessageStore::new())),
            gateway,
            events,
            time,
        }
    }

    /// The lock-guarded table.
    ///
    /// The filter engine takes this write lock (before the filter registry
    /// lock) to persist results.
    #[must_use]
    pub fn store(&self) -> &Arc<RwLock<MessageStore>> {
        &self.store
    }

}

#[async_trait]
impl<G: CiphertextGateway + ?Sized> MessageStoreApi for MessageService<G> {
    #[instrument(skip(self, input, proof), fields(sender = %sender.short(), receiver = %receiver.short()))]
    async fn submit_message(
        &self,
        sender: PartyId,
        receiver: PartyId,
        input: CiphertextInput,
        proof: InputProof,
    ) -> Result<MessageId, LedgerError> {
        let content = match admit(&*self.gateway, &input, &proof).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Message rejected");
                record_rejection("submit_message", e.kind().as_str());
                return Err(e);
            }
        };
        let created_at = self.time.now();

        let (id, count) = {
            let mut store = self.store.write().await;
            let id = store.insert(sender, receiver, content, created_at);
            self.events
                .publish(LedgerEvent::MessageCreated {
                    id,
                    sender,
                    receiver,
                })
                .await;
            (id, store.count())
        };

        record_message_submitted(count);
        log_message_event!(info, SUBSYSTEM, "Message stored", id, content = %content);
        Ok(id)
    }

    async fn get_message(&self, id: MessageId) -> Result<Message, LedgerError> {
        self.store.read().await.get(id).cloned()
    }

    async fn get_user_messages(&self, party: PartyId) -> Vec<MessageId> {
        self.store.read().await.user_messages(&party)
    }

    async fn message_count(&self) -> u64 {
        self.store.read().await.count()
    }
}
