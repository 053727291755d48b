//! # Ledger Container
//!
//! Holds the three subsystem services around one gateway and one event bus.
//!
//! ## Initialization Order
//!
//! ```text
//! 1. Event bus (shared by every subsystem)
//! 2. Message Store, Filter Registry (gateway + bus + clock)
//! 3. Filter Engine (lock handles of 2, gateway + bus)
//! ```
//!
//! ## Thread Safety
//!
//! - Each table lives behind one `tokio::sync::RwLock` owned by its service
//! - The engine borrows both handles; lock order is messages then filters
//! - The container is `Send + Sync` and is shared behind an `Arc`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use cl_01_message_store::{MessageService, MessageStoreApi};
use cl_02_filter_registry::{FilterRegistryApi, FilterService};
use cl_03_filter_engine::FilterEngine;
use cl_ciphertext_gateway::CiphertextGateway;
use shared_bus::{InMemoryEventBus, SequencedEvent};
use shared_types::{
    FilterId, FilterRule, LedgerError, Message, MessageId, PartyId, SystemTimeSource, TimeSource,
};

use crate::container::config::LedgerConfig;
use crate::query::LedgerQueryApi;

/// The wired ledger.
pub struct Ledger<G: ?Sized> {
    config: LedgerConfig,
    event_bus: Arc<InMemoryEventBus>,
    gateway: Arc<G>,
    messages: MessageService<G>,
    filters: FilterService<G>,
    engine: FilterEngine<G>,
}

impl<G: CiphertextGateway + ?Sized> Ledger<G> {
    /// Wire the subsystems with the system clock.
    pub fn new(config: LedgerConfig, gateway: Arc<G>) -> Self {
        Self::with_time_source(config, gateway, Arc::new(SystemTimeSource))
    }

    /// Wire the subsystems with an explicit clock.
    #[instrument(name = "ledger_init", skip_all, fields(backend = %gateway.backend()))]
    pub fn with_time_source(
        config: LedgerConfig,
        gateway: Arc<G>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        let event_bus = Arc::new(InMemoryEventBus::with_capacity(config.bus.capacity));

        let messages = MessageService::new(Arc::clone(&gateway), event_bus.clone(), Arc::clone(&time));
        let filters = FilterService::with_config(
            config.registry_config(),
            Arc::clone(&gateway),
            event_bus.clone(),
            time,
        );
        info!(
            toggle_policy = %config.authorization.toggle,
            "Message store and filter registry initialized"
        );

        let engine = FilterEngine::new(
            config.engine_config(),
            Arc::clone(messages.store()),
            Arc::clone(filters.registry()),
            Arc::clone(&gateway),
            event_bus.clone(),
        );
        info!(
            apply_policy = %config.authorization.apply,
            disclosure_timeout_ms = config.engine.disclosure_timeout.as_millis() as u64,
            "Filter engine initialized"
        );

        Self {
            config,
            event_bus,
            gateway,
            messages,
            filters,
            engine,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    #[must_use]
    pub fn event_bus(&self) -> &Arc<InMemoryEventBus> {
        &self.event_bus
    }

    #[must_use]
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Message Store (CL-01).
    #[must_use]
    pub fn messages(&self) -> &MessageService<G> {
        &self.messages
    }

    /// Filter Registry (CL-02).
    #[must_use]
    pub fn filters(&self) -> &FilterService<G> {
        &self.filters
    }

    /// Filter Application Engine (CL-03).
    #[must_use]
    pub fn engine(&self) -> &FilterEngine<G> {
        &self.engine
    }
}

#[async_trait]
impl<G: CiphertextGateway + ?Sized> LedgerQueryApi for Ledger<G> {
    async fn get_message(&self, id: MessageId) -> Result<Message, LedgerError> {
        self.messages.get_message(id).await
    }

    async fn get_filter(&self, id: FilterId) -> Result<FilterRule, LedgerError> {
        self.filters.get_filter(id).await
    }

    async fn get_user_messages(&self, party: PartyId) -> Vec<MessageId> {
        self.messages.get_user_messages(party).await
    }

    async fn get_user_filters(&self, creator: PartyId) -> Vec<FilterId> {
        self.filters.get_user_filters(creator).await
    }

    async fn message_count(&self) -> u64 {
        self.messages.message_count().await
    }

    async fn filter_count(&self) -> u64 {
        self.filters.filter_count().await
    }

    async fn is_filter_active(&self, id: FilterId) -> Result<bool, LedgerError> {
        self.filters.is_filter_active(id).await
    }

    async fn events_since(&self, sequence: u64) -> Vec<SequencedEvent> {
        self.event_bus.history_since(sequence)
    }
}
