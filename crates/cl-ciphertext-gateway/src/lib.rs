//! # Ciphertext Gateway
//!
//! Capability interface between the ledger and a homomorphic-encryption
//! backend. The ledger never sees plaintext or ciphertext bytes after
//! submission; it only holds [`CiphertextHandle`]s and asks the gateway to
//! operate on them.
//!
//! ## Backends
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | Local | [`backends::local::LocalGateway`] | Deterministic keyed test double |
//! | Oracle | [`backends::oracle::OracleGateway`] | Routes disclosure through an async decryption oracle |
//!
//! A real FHE backend implements [`CiphertextGateway`] directly.
//!
//! ## Capability Model
//!
//! Each handle carries an explicit [`PermissionSet`]. Homomorphic operations
//! require [`Permission::Compute`] on every operand and disclosure requires
//! [`Permission::Disclose`]. Grants are idempotent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cl_ciphertext_gateway::{backends::local::LocalGateway, CiphertextGateway};
//!
//! let gateway = LocalGateway::random();
//! let (input, proof) = gateway.encrypt(5);
//! let handle = gateway.materialize(&input, &proof).await?;
//! ```

pub mod backends;
pub mod permissions;

use async_trait::async_trait;
use std::sync::Arc;

pub use permissions::PermissionSet;
pub use shared_types::{CiphertextHandle, CiphertextInput, GatewayError, InputProof, Permission};

use shared_types::LedgerError;
use tracing::warn;

/// Gateway backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-process keyed test double.
    Local,
    /// Disclosure served by an asynchronous decryption oracle.
    Oracle,
    /// Externally provided cryptographic backend.
    External,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Local => write!(f, "local"),
            Backend::Oracle => write!(f, "oracle"),
            Backend::External => write!(f, "external"),
        }
    }
}

/// Ciphertext gateway trait - implemented by all backends.
#[async_trait]
pub trait CiphertextGateway: Send + Sync {
    /// Get backend type.
    fn backend(&self) -> Backend;

    /// Validate `input` against `proof` and return a handle to the stored
    /// ciphertext. The returned handle starts with no permissions.
    async fn materialize(
        &self,
        input: &CiphertextInput,
        proof: &InputProof,
    ) -> Result<CiphertextHandle, GatewayError>;

    /// Allow `handle` to be used as an operand of homomorphic operations.
    async fn grant_compute(&self, handle: CiphertextHandle) -> Result<(), GatewayError>;

    /// Allow `handle` to be decrypted.
    async fn grant_disclosure(&self, handle: CiphertextHandle) -> Result<(), GatewayError>;

    /// Homomorphic equality. The result encrypts 1 when the plaintexts are
    /// equal and 0 otherwise.
    async fn equals(
        &self,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<CiphertextHandle, GatewayError>;

    /// Decrypt `handle` to its plaintext value. May suspend for as long as
    /// the decrypting authority takes.
    async fn disclose(&self, handle: CiphertextHandle) -> Result<u64, GatewayError>;
}

#[async_trait]
impl<G: CiphertextGateway + ?Sized> CiphertextGateway for Arc<G> {
    fn backend(&self) -> Backend {
        (**self).backend()
    }

    async fn materialize(
        &self,
        input: &CiphertextInput,
        proof: &InputProof,
    ) -> Result<CiphertextHandle, GatewayError> {
        (**self).materialize(input, proof).await
    }

    async fn grant_compute(&self, handle: CiphertextHandle) -> Result<(), GatewayError> {
        (**self).grant_compute(handle).await
    }

    async fn grant_disclosure(&self, handle: CiphertextHandle) -> Result<(), GatewayError> {
        (**self).grant_disclosure(handle).await
    }

    async fn equals(
        &self,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<CiphertextHandle, GatewayError> {
        (**self).equals(a, b).await
    }

    async fn disclose(&self, handle: CiphertextHandle) -> Result<u64, GatewayError> {
        (**self).disclose(handle).await
    }
}

/// Materialize client input and grant the capabilities every stored ledger
/// handle carries (compute and disclosure).
///
/// Any failure before a usable handle exists is reported as
/// `InvalidCiphertext`; nothing is allocated by the caller in that case.
pub async fn admit<G: CiphertextGateway + ?Sized>(
    gateway: &G,
    input: &CiphertextInput,
    proof: &InputProof,
) -> Result<CiphertextHandle, LedgerError> {
    let handle = gateway
        .materialize(input, proof)
        .await
        .map_err(|e| LedgerError::invalid_ciphertext(&e))?;

    if !handle.is_initialized() {
        warn!(backend = %gateway.backend(), "Gateway returned an uninitialized handle");
        return Err(LedgerError::InvalidCiphertext {
            reason: "gateway returned an uninitialized handle".to_string(),
        });
    }

    gateway.grant_compute(handle).await?;
    gateway.grant_disclosure(handle).await?;
    Ok(handle)
}
