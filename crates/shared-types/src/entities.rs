//! # Core Domain Entities
//!
//! Defines the ledger records and the identifiers they are keyed by.
//!
//! ## Clusters
//!
//! - **Identities**: `PartyId`, `MessageId`, `FilterId`
//! - **Ciphertext references**: `CiphertextHandle`, `CiphertextInput`, `InputProof`
//! - **Records**: `Message`, `FilterRule`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::LedgerError;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

// =============================================================================
// CLUSTER A: IDENTITIES
// =============================================================================

/// A party identifier (32-byte public key or account hash).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct PartyId(pub [u8; 32]);

impl PartyId {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    /// First four bytes in hex, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Dense message identity, allocated from 0 by the Message Store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl MessageId {
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense filter identity, allocated from 0 by the Filter Registry.
///
/// The filter counter is independent of the message counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterId(pub u64);

impl FilterId {
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for FilterId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CLUSTER B: CIPHERTEXT REFERENCES
// =============================================================================

/// Opaque reference to ciphertext held by the gateway.
///
/// Handles are immutable and freely copied; they never expose plaintext.
/// The all-zero handle is the uninitialized sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CiphertextHandle(pub [u8; 32]);

impl CiphertextHandle {
    /// Sentinel for a handle the gateway never initialized.
    pub const UNINITIALIZED: Self = Self([0u8; 32]);

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        *self != Self::UNINITIALIZED
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

/// Raw ciphertext bytes as submitted by a client, before materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextInput(pub Vec<u8>);

impl CiphertextInput {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Proof accompanying a [`CiphertextInput`], checked by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

impl InputProof {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Capability that can be granted on a ciphertext handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Handle may be used as an operand of homomorphic operations.
    Compute,
    /// Handle may be decrypted to plaintext.
    Disclose,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Compute => write!(f, "compute"),
            Permission::Disclose => write!(f, "disclose"),
        }
    }
}

// =============================================================================
// CLUSTER C: RECORDS
// =============================================================================

/// Lifecycle of a message.
///
/// ```text
/// [Created] ──apply_filter──→ [Filtered]   (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageState {
    /// No filter has been applied yet.
    Created,
    /// A filter was applied and its result disclosed.
    Filtered { filter_id: FilterId, result: u64 },
}

/// An encrypted message deposited by `sender` for `receiver`.
///
/// The filter fields are private: the only way to change them is
/// [`Message::mark_filtered`], which succeeds at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: PartyId,
    pub receiver: PartyId,
    /// Handle of the encrypted content.
    pub content: CiphertextHandle,
    pub created_at: Timestamp,
    filtered: bool,
    filter_result: u64,
    applied_filter: Option<FilterId>,
}

impl Message {
    /// Creates a message in the `Created` state.
    pub fn new(
        id: MessageId,
        sender: PartyId,
        receiver: PartyId,
        content: CiphertextHandle,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender,
            receiver,
            content,
            created_at,
            filtered: false,
            filter_result: 0,
            applied_filter: None,
        }
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    /// Disclosed filter result. Zero until the message is filtered.
    #[must_use]
    pub fn filter_result(&self) -> u64 {
        self.filter_result
    }

    /// The filter that produced the result, if any.
    #[must_use]
    pub fn applied_filter(&self) -> Option<FilterId> {
        self.applied_filter
    }

    #[must_use]
    pub fn state(&self) -> MessageState {
        match self.applied_filter {
            Some(filter_id) if self.filtered => MessageState::Filtered {
                filter_id,
                result: self.filter_result,
            },
            _ => MessageState::Created,
        }
    }

    /// Records the disclosed result of a filter application.
    ///
    /// # Errors
    ///
    /// `AlreadyFiltered` if a result was already recorded. The existing
    /// result is left untouched.
    pub fn mark_filtered(&mut self, filter_id: FilterId, result: u64) -> Result<(), LedgerError> {
        if self.filtered {
            return Err(LedgerError::AlreadyFiltered(self.id));
        }
        self.filtered = true;
        self.filter_result = result;
        self.applied_filter = Some(filter_id);
        Ok(())
    }
}

/// An encrypted keyword pattern registered by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub id: FilterId,
    pub creator: PartyId,
    /// Descriptive label. Not cryptographically meaningful.
    pub keyword: String,
    /// Handle of the encrypted pattern.
    pub pattern: CiphertextHandle,
    pub created_at: Timestamp,
    active: bool,
}

impl FilterRule {
    /// Creates an active filter.
    pub fn new(
        id: FilterId,
        creator: PartyId,
        keyword: impl Into<String>,
        pattern: CiphertextHandle,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            creator,
            keyword: keyword.into(),
            pattern,
            created_at,
            active: true,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}
