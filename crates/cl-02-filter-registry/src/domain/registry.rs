//! Filter table and per-creator index.

use shared_types::{CiphertextHandle, FilterId, FilterRule, LedgerError, PartyId, Timestamp};
use std::collections::HashMap;

/// Append-only filter table. Ids are dense from 0 and independent of
/// message ids.
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: Vec<FilterRule>,
    by_creator: HashMap<PartyId, Vec<FilterId>>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.filters.len() as u64
    }

    /// Allocate the next id and store an active filter.
    pub fn insert(
        &mut self,
        creator: PartyId,
        keyword: String,
        pattern: CiphertextHandle,
        created_at: Timestamp,
    ) -> FilterId {
        let id = FilterId(self.count());
        self.filters
            .push(FilterRule::new(id, creator, keyword, pattern, created_at));
        self.by_creator.entry(creator).or_default().push(id);
        id
    }

    pub fn get(&self, id: FilterId) -> Result<&FilterRule, LedgerError> {
        self.filters
            .get(Self::index(id))
            .ok_or_else(|| LedgerError::FilterNotFound {
                id,
                count: self.count(),
            })
    }

    pub fn get_mut(&mut self, id: FilterId) -> Result<&mut FilterRule, LedgerError> {
        let count = self.count();
        self.filters
            .get_mut(Self::index(id))
            .ok_or(LedgerError::FilterNotFound { id, count })
    }

    /// Filter ids registered by `creator`, in creation order.
    #[must_use]
    pub fn user_filters(&self, creator: &PartyId) -> Vec<FilterId> {
        self.by_creator.get(creator).cloned().unwrap_or_default()
    }

    fn index(id: FilterId) -> usize {
        usize::try_from(id.as_u64()).unwrap_or(usize::MAX)
    }
}
