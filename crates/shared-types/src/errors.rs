//! # Error Types
//!
//! Defines error types used across the ledger subsystems.

use thiserror::Error;

use crate::entities::{CiphertextHandle, FilterId, MessageId, PartyId, Permission};

/// Errors reported by a ciphertext gateway backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The input proof did not verify against the ciphertext.
    #[error("Input proof rejected")]
    InvalidProof,

    /// The ciphertext bytes could not be parsed.
    #[error("Malformed ciphertext input: {0}")]
    MalformedInput(String),

    /// The handle does not refer to any ciphertext known to the gateway.
    #[error("Unknown ciphertext handle: {0}")]
    UnknownHandle(CiphertextHandle),

    /// A capability required for the operation was never granted.
    #[error("Permission '{permission}' not granted on handle {handle}")]
    PermissionDenied {
        handle: CiphertextHandle,
        permission: Permission,
    },

    /// The decryption oracle stopped serving requests.
    #[error("Decryption oracle unavailable")]
    OracleUnavailable,
}

/// Errors surfaced by ledger operations.
///
/// Every mutating operation reports failures synchronously; nothing is
/// retried by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Gateway rejected the input proof or returned an uninitialized handle.
    #[error("Invalid ciphertext: {reason}")]
    InvalidCiphertext { reason: String },

    /// Message id is outside the allocated range.
    #[error("Message {id} not found ({count} messages allocated)")]
    MessageNotFound { id: MessageId, count: u64 },

    /// Filter id is outside the allocated range.
    #[error("Filter {id} not found ({count} filters allocated)")]
    FilterNotFound { id: FilterId, count: u64 },

    /// Filter exists but is currently disabled.
    #[error("Filter {0} is inactive")]
    FilterInactive(FilterId),

    /// Message already carries a terminal filter result.
    #[error("Message {0} has already been filtered")]
    AlreadyFiltered(MessageId),

    /// Caller is not allowed to perform the operation under the active policy.
    #[error("Party {caller} is not authorized to {operation}")]
    Unauthorized {
        caller: PartyId,
        operation: &'static str,
    },

    /// Disclosure did not complete within the configured bound.
    #[error("Disclosure for message {message_id} timed out after {elapsed_ms}ms")]
    DisclosureTimeout {
        message_id: MessageId,
        elapsed_ms: u64,
    },

    /// Gateway failure after validation (equality or disclosure).
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Coarse classification of [`LedgerError`], used for metrics labels and
/// retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCiphertext,
    NotFound,
    FilterInactive,
    AlreadyFiltered,
    Unauthorized,
    DisclosureTimeout,
    Gateway,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCiphertext => "invalid_ciphertext",
            ErrorKind::NotFound => "not_found",
            ErrorKind::FilterInactive => "filter_inactive",
            ErrorKind::AlreadyFiltered => "already_filtered",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::DisclosureTimeout => "disclosure_timeout",
            ErrorKind::Gateway => "gateway",
        }
    }
}

impl LedgerError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCiphertext { .. } => ErrorKind::InvalidCiphertext,
            Self::MessageNotFound { .. } | Self::FilterNotFound { .. } => ErrorKind::NotFound,
            Self::FilterInactive(_) => ErrorKind::FilterInactive,
            Self::AlreadyFiltered(_) => ErrorKind::AlreadyFiltered,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::DisclosureTimeout { .. } => ErrorKind::DisclosureTimeout,
            Self::Gateway(_) => ErrorKind::Gateway,
        }
    }

    /// Whether the same request may succeed later without new input.
    ///
    /// `FilterInactive` clears once the filter is toggled back on; timeouts and
    /// an unavailable oracle are transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FilterInactive(_)
                | Self::DisclosureTimeout { .. }
                | Self::Gateway(GatewayError::OracleUnavailable)
        )
    }

    /// Wraps a materialization failure as `InvalidCiphertext`.
    pub fn invalid_ciphertext(source: &GatewayError) -> Self {
        Self::InvalidCiphertext {
            reason: source.to_string(),
        }
    }
}
