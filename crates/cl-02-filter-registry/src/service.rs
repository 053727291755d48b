//! # Filter Registry Service
//!
//! Implements [`FilterRegistryApi`] over a lock-guarded [`FilterRegistry`].
//! Creation mirrors message submission: gateway validation outside the lock,
//! then allocation, indexing and the `FilterCreated` event in one critical
//! section.

use async_trait::async_trait;
use cl_ciphertext_gateway::admit;
use ledger_telemetry::{
    log_filter_event, record_filter_created, record_filter_toggled, record_rejection,
};
use shared_bus::LedgerEvent;
use shared_types::{CiphertextInput, FilterId, FilterRule, InputProof, LedgerError, PartyId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{instrument, warn};

use crate::domain::{FilterRegistry, ToggleAuthorization};
use crate::ports::{CiphertextGateway, EventPublisher, FilterRegistryApi, TimeSource};

/// Subsystem label used in logs.
pub const SUBSYSTEM: &str = "filter-registry";

/// Filter Registry configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Who may toggle a filter.
    pub toggle_authorization: ToggleAuthorization,
}

/// Filter Registry service.
pub struct FilterService<G: ?Sized> {
    config: RegistryConfig,
    registry: Arc<RwLock<FilterRegistry>>,
    gateway: Arc<G>,
    events: Arc<dyn EventPublisher>,
    time: Arc<dyn TimeSource>,
}

impl<G: CiphertextGateway + ?Sized> FilterService<G> {
    pub fn new(
        gateway: Arc<G>,
        events: Arc<dyn EventPublisher>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self::with_config(RegistryConfig::default(), gateway, events, time)
    }

    pub fn with_config(
        config: RegistryConfig,
        gateway: Arc<G>,
        events: Arc<dyn EventPublisher>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            registry: Arc::new(RwLock::new(FilterRegistry::new())),
            gateway,
            events,
            time,
        }
    }

    /// The lock-guarded table. Always acquire after the message store lock.
    #[must_use]
    pub fn registry(&self) -> &Arc<RwLock<FilterRegistry>> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

#[async_trait]
impl<G: CiphertextGateway + ?Sized> FilterRegistryApi for FilterService<G> {
    #[instrument(skip(self, input, proof), fields(creator = %creator.short()))]
    async fn create_filter(
        &self,
        creator: PartyId,
        keyword: String,
        input: CiphertextInput,
        proof: InputProof,
    ) -> Result<FilterId, LedgerError> {
        let pattern = match admit(&*self.gateway, &input, &proof).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "Filter rejected");
                record_rejection("create_filter", e.kind().as_str());
                return Err(e);
            }
        };
        let created_at = self.time.now();

        let (id, count) = {
            let mut registry = self.registry.write().await;
            let id = registry.insert(creator, keyword, pattern, created_at);
            self.events
                .publish(LedgerEvent::FilterCreated { id, creator })
                .await;
            (id, registry.count())
        };

        record_filter_created(count);
        log_filter_event!(info, SUBSYSTEM, "Filter registered", id, pattern = %pattern);
        Ok(id)
    }

    #[instrument(skip(self), fields(caller = %caller.short(), filter_id = %id))]
    async fn toggle_filter(&self, caller: PartyId, id: FilterId) -> Result<bool, LedgerError> {
        let result = {
            let mut registry = self.registry.write().await;
            registry.get_mut(id).and_then(|rule| {
                self.config.toggle_authorization.check(&caller, rule)?;
                Ok(rule.toggle())
            })
        };

        match result {
            Ok(active) => {
                record_filter_toggled(active);
                log_filter_event!(info, SUBSYSTEM, "Filter toggled", id, active);
            }
            Err(ref e) => {
                warn!(error = %e, "Toggle rejected");
                record_rejection("toggle_filter", e.kind().as_str());
            }
        }
        result
    }

    async fn get_filter(&self, id: FilterId) -> Result<FilterRule, LedgerError> {
        self.registry.read().await.get(id).cloned()
    }

    async fn get_user_filters(&self, creator: PartyId) -> Vec<FilterId> {
        self.registry.read().await.user_filters(&creator)
    }

    async fn filter_count(&self) -> u64 {
        self.registry.read().await.count()
    }

    async fn is_filter_active(&self, id: FilterId) -> Result<bool, LedgerError> {
        self.registry
            .read()
            .await
            .get(id)
            .map(FilterRule::is_active)
    }
}
