//! # Filter Engine Service
//!
//! ## Application Flow
//!
//! ```text
//! 1. validate      read locks (messages → filters), snapshot handles
//! 2. equals        gateway, no lock held
//! 3. disclose      gateway, no lock held, bounded by disclosure_timeout
//! 4. persist       write lock messages, read lock filters:
//!                  re-validate, mark_filtered, publish FilterApplied
//! ```
//!
//! Any number of calls may race through steps 1-3 for the same message;
//! step 4 is serialized by the message store lock and only the first call
//! finds the message unfiltered. The rest fail with `AlreadyFiltered`.
//!
//! A timeout, a gateway error or a dropped future before step 4 leaves the
//! message in `Created`.

use async_trait::async_trait;
use cl_01_message_store::MessageStore;
use cl_02_filter_registry::FilterRegistry;
use ledger_telemetry::{log_message_event, record_disclosure, record_filter_applied, record_rejection};
use shared_bus::LedgerEvent;
use shared_types::{FilterId, LedgerError, MessageId, PartyId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::domain::{check_applicable, Applicable, EngineConfig};
use crate::ports::{CiphertextGateway, EventPublisher, FilterEngineApi};

/// Subsystem label used in logs.
pub const SUBSYSTEM: &str = "filter-engine";

/// Filter Application Engine.
pub struct FilterEngine<G: ?Sized> {
    config: EngineConfig,
    messages: Arc<RwLock<MessageStore>>,
    filters: Arc<RwLock<FilterRegistry>>,
    gateway: Arc<G>,
    events: Arc<dyn EventPublisher>,
}

impl<G: CiphertextGateway + ?Sized> FilterEngine<G> {
    /// `messages` and `filters` are the lock handles owned by the Message
    /// Store and Filter Registry services.
    pub fn new(
        config: EngineConfig,
        messages: Arc<RwLock<MessageStore>>,
        filters: Arc<RwLock<FilterRegistry>>,
        gateway: Arc<G>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            messages,
            filters,
            gateway,
            events,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn validate(
        &self,
        caller: &PartyId,
        message_id: MessageId,
        filter_id: FilterId,
    ) -> Result<Applicable, LedgerError> {
        let messages = self.messages.read().await;
        let filters = self.filters.read().await;
        check_applicable(
            &messages,
            &filters,
            self.config.apply_authorization,
            caller,
            message_id,
            filter_id,
        )
    }

    async fn evaluate(
        &self,
        message_id: MessageId,
        operands: Applicable,
    ) -> Result<u64, LedgerError> {
        let result = self.gateway.equals(operands.content, operands.pattern).await?;
        self.gateway.grant_disclosure(result).await?;
        debug!(%result, "Equality computed, awaiting disclosure");

        let started = Instant::now();
        let disclosed =
            tokio::time::timeout(self.config.disclosure_timeout, self.gateway.disclose(result))
                .await;
        let elapsed = started.elapsed();
        record_disclosure(elapsed);

        match disclosed {
            Ok(value) => Ok(value?),
            Err(_) => Err(LedgerError::DisclosureTimeout {
                message_id,
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn persist(
        &self,
        caller: &PartyId,
        message_id: MessageId,
        filter_id: FilterId,
        value: u64,
    ) -> Result<(), LedgerError> {
        let mut messages = self.messages.write().await;
        let filters = self.filters.read().await;

        check_applicable(
            &messages,
            &filters,
            self.config.apply_authorization,
            caller,
            message_id,
            filter_id,
        )?;
        messages.mark_filtered(message_id, filter_id, value)?;

        self.events
            .publish(LedgerEvent::FilterApplied {
                message_id,
                filter_id,
                result: value,
            })
            .await;
        Ok(())
    }

    async fn apply(
        &self,
        caller: PartyId,
        message_id: MessageId,
        filter_id: FilterId,
    ) -> Result<u64, LedgerError> {
        let operands = self.validate(&caller, message_id, filter_id).await?;
        let value = self.evaluate(message_id, operands).await?;
        self.persist(&caller, message_id, filter_id, value).await?;
        Ok(value)
    }
}

#[async_trait]
impl<G: CiphertextGateway + ?Sized> FilterEngineApi for FilterEngine<G> {
    #[instrument(skip(self), fields(caller = %caller.short(), message_id = %message_id, filter_id = %filter_id))]
    async fn apply_filter(
        &self,
        caller: PartyId,
        message_id: MessageId,
        filter_id: FilterId,
    ) -> Result<u64, LedgerError> {
        match self.apply(caller, message_id, filter_id).await {
            Ok(value) => {
                record_filter_applied(value);
                log_message_event!(info, SUBSYSTEM, "Filter applied", message_id, filter_id = %filter_id, result = value);
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, retryable = e.is_retryable(), "Filter application rejected");
                record_rejection("apply_filter", e.kind().as_str());
                Err(e)
            }
        }
    }
}
