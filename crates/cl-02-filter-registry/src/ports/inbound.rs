//! Inbound Ports (Driving Ports)

use async_trait::async_trait;
use shared_types::{CiphertextInput, FilterId, FilterRule, InputProof, LedgerError, PartyId};

/// Primary Filter Registry API (Driving Port)
#[async_trait]
pub trait FilterRegistryApi: Send + Sync {
    /// Register an encrypted keyword pattern. The filter starts active.
    ///
    /// `keyword` is a descriptive label only; matching uses the encrypted
    /// pattern.
    ///
    /// # Errors
    ///
    /// `InvalidCiphertext` if the gateway rejects the input.
    async fn create_filter(
        &self,
        creator: PartyId,
        keyword: String,
        input: CiphertextInput,
        proof: InputProof,
    ) -> Result<FilterId, LedgerError>;

    /// Flip the filter's active flag and return the new value.
    ///
    /// # Errors
    ///
    /// `FilterNotFound` for an unallocated id; `Unauthorized` when the
    /// registry runs with a restrictive toggle policy.
    async fn toggle_filter(&self, caller: PartyId, id: FilterId) -> Result<bool, LedgerError>;

    /// Snapshot of a registered filter.
    async fn get_filter(&self, id: FilterId) -> Result<FilterRule, LedgerError>;

    /// Filter ids registered by `creator`, in creation order.
    async fn get_user_filters(&self, creator: PartyId) -> Vec<FilterId>;

    /// Number of filters allocated so far.
    async fn filter_count(&self) -> u64;

    /// Whether the filter is currently active.
    async fn is_filter_active(&self, id: FilterId) -> Result<bool, LedgerError>;
}
