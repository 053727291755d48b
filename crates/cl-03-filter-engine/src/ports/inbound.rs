//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{FilterId, LedgerError, MessageId, PartyId};

/// Filter application API (Driving Port)
#[async_trait]
pub trait FilterEngineApi: Send + Sync {
    /// Homomorphically test the message content against the filter pattern,
    /// disclose the result and record it on the message.
    ///
    /// Returns the disclosed result: 1 if the plaintexts are equal, else 0.
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` / `FilterNotFound`: id out of range
    /// - `Unauthorized`: rejected by the apply policy
    /// - `FilterInactive`: the filter is switched off
    /// - `AlreadyFiltered`: the message already carries a result, including
    ///   when a concurrent application won the race
    /// - `DisclosureTimeout`: the gateway did not disclose in time; the
    ///   message is left unfiltered
    /// - `Gateway`: equality or disclosure failed
    async fn apply_filter(
        &self,
        caller: PartyId,
        message_id: MessageId,
        filter_id: FilterId,
    ) -> Result<u64, LedgerError>;
}
