//! Pre-conditions for applying a filter.
//!
//! Checked twice per application: once before touching the gateway and again
//! under the write locks right before the result is persisted.

use cl_01_message_store::MessageStore;
use cl_02_filter_registry::FilterRegistry;
use shared_types::{CiphertextHandle, FilterId, LedgerError, MessageId, PartyId};

use super::ApplyAuthorization;

/// Operands of an application that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applicable {
    pub content: CiphertextHandle,
    pub pattern: CiphertextHandle,
}

/// Validate `(message_id, filter_id)` for `caller`.
///
/// Order of checks: message exists, filter exists, caller authorized,
/// filter active, message not yet filtered.
pub fn check_applicable(
    messages: &MessageStore,
    filters: &FilterRegistry,
    policy: ApplyAuthorization,
    caller: &PartyId,
    message_id: MessageId,
    filter_id: FilterId,
) -> Result<Applicable, LedgerError> {
    let message = messages.get(message_id)?;
    let rule = filters.get(filter_id)?;

    policy.check(caller, message)?;

    if !rule.is_active() {
        return Err(LedgerError::FilterInactive(filter_id));
    }
    if message.is_filtered() {
        return Err(LedgerError::AlreadyFiltered(message_id));
    }

    Ok(Applicable {
        content: message.content,
        pattern: rule.pattern,
    })
}
