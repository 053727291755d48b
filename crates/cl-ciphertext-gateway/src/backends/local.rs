//! Local gateway backend
//!
//! Keyed test double. Ciphertexts are a 16-byte nonce followed by the
//! little-endian plaintext XORed with a SHA-256 keystream; the input proof is
//! an HMAC-SHA256 tag over the ciphertext bytes. Plaintexts are kept next to
//! their handles so `equals` and `disclose` can be evaluated directly.
//!
//! This gives the ledger the same observable contract as a real FHE backend
//! (opaque handles, proof checks, explicit grants) without any of the
//! security.

use crate::{Backend, CiphertextGateway, PermissionSet};
use async_trait::async_trait;
use hmac::digest::generic_array::GenericArray;
use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use rand::RngCore;
use sha2::{Digest, Sha256};
use shared_types::{CiphertextHandle, CiphertextInput, GatewayError, InputProof, Permission};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Nonce prefix length of a local ciphertext.
pub const NONCE_LEN: usize = 16;

/// Total length of a local ciphertext (nonce + encrypted u64).
pub const CIPHERTEXT_LEN: usize = NONCE_LEN + 8;

/// Domain separators.
const HANDLE_TAG: &[u8] = b"cipher-ledger/handle";
const NONCE_TAG: &[u8] = b"cipher-ledger/nonce";

struct Entry {
    value: u64,
    permissions: PermissionSet,
}

/// In-process gateway over a single symmetric key.
pub struct LocalGateway {
    key: [u8; 32],
    /// Proof MAC keyed once at construction; cloned per use.
    mac: HmacSha256,
    entries: RwLock<HashMap<CiphertextHandle, Entry>>,
    next_handle: AtomicU64,
    next_nonce: AtomicU64,
    disclosure_delay: Option<Duration>,
}

impl LocalGateway {
    pub fn new(key: [u8; 32]) -> Self {
        // HMAC zero-pads short keys to the block size, so this is the same
        // MAC as keying with the 32 raw bytes.
        let mut block = [0u8; 64];
        block[..32].copy_from_slice(&key);
        let mac = <HmacSha256 as Mac>::new(GenericArray::from_slice(&block));

        Self {
            key,
            mac,
            entries: RwLock::new(HashMap::new()),
            next_handle: AtomicU64::new(0),
            next_nonce: AtomicU64::new(0),
            disclosure_delay: None,
        }
    }

    /// Gateway with a freshly generated key.
    pub fn random() -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self::new(key)
    }

    /// Make every `disclose` sleep for `delay` before answering.
    #[must_use]
    pub fn with_disclosure_delay(mut self, delay: Duration) -> Self {
        self.disclosure_delay = Some(delay);
        self
    }

    /// Encrypt `value` under this gateway's key.
    ///
    /// Nonces come from a counter, so output is deterministic for a given key
    /// and call order.
    pub fn encrypt(&self, value: u64) -> (CiphertextInput, InputProof) {
        let counter = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(NONCE_TAG);
        hasher.update(self.key);
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);

        let mut bytes = Vec::with_capacity(CIPHERTEXT_LEN);
        bytes.extend_from_slice(&nonce);
        bytes.extend(xor_keystream(&self.key, &nonce, value.to_le_bytes()));

        let proof = self.sign(&bytes);
        (CiphertextInput(bytes), InputProof(proof))
    }

    /// Permissions currently granted on `handle`, if the handle exists.
    #[must_use]
    pub fn permissions(&self, handle: CiphertextHandle) -> Option<PermissionSet> {
        self.entries.read().get(&handle).map(|e| e.permissions)
    }

    /// Number of ciphertexts held.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.entries.read().len()
    }

    fn sign(&self, ciphertext: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(ciphertext);
        mac.finalize().into_bytes().to_vec()
    }

    fn verify(&self, ciphertext: &[u8], proof: &[u8]) -> Result<(), GatewayError> {
        let mut mac = self.mac.clone();
        mac.update(ciphertext);
        mac.verify_slice(proof).map_err(|_| GatewayError::InvalidProof)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<u64, GatewayError> {
        if ciphertext.len() != CIPHERTEXT_LEN {
            return Err(GatewayError::MalformedInput(format!(
                "expected {} bytes, got {}",
                CIPHERTEXT_LEN,
                ciphertext.len()
            )));
        }
        let (nonce, body) = ciphertext.split_at(NONCE_LEN);
        let mut block = [0u8; 8];
        block.copy_from_slice(body);
        Ok(u64::from_le_bytes(xor_keystream(&self.key, nonce, block)))
    }

    fn store(&self, value: u64) -> CiphertextHandle {
        let index = self.next_handle.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(HANDLE_TAG);
        hasher.update(index.to_le_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        let handle = CiphertextHandle(bytes);

        self.entries.write().insert(
            handle,
            Entry {
                value,
                permissions: PermissionSet::default(),
            },
        );
        handle
    }

    fn grant(&self, handle: CiphertextHandle, permission: Permission) -> Result<(), GatewayError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&handle)
            .ok_or(GatewayError::UnknownHandle(handle))?;
        entry.permissions.grant(permission);
        debug!(%handle, %permission, "Permission granted");
        Ok(())
    }

    fn value_with(&self, handle: CiphertextHandle, permission: Permission) -> Result<u64, GatewayError> {
        let entries = self.entries.read();
        let entry = entries
            .get(&handle)
            .ok_or(GatewayError::UnknownHandle(handle))?;
        entry.permissions.require(handle, permission)?;
        Ok(entry.value)
    }
}

fn xor_keystream(key: &[u8; 32], nonce: &[u8], block: [u8; 8]) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.update(nonce);
    let stream = hasher.finalize();

    let mut out = block;
    for (b, k) in out.iter_mut().zip(stream.iter()) {
        *b ^= k;
    }
    out
}

#[async_trait]
impl CiphertextGateway for LocalGateway {
    fn backend(&self) -> Backend {
        Backend::Local
    }

    async fn materialize(
        &self,
        input: &CiphertextInput,
        proof: &InputProof,
    ) -> Result<CiphertextHandle, GatewayError> {
        if let Err(e) = self.verify(input.as_bytes(), proof.as_bytes()) {
            warn!(len = input.as_bytes().len(), "Rejected ciphertext input");
            return Err(e);
        }
        let value = self.decrypt(input.as_bytes())?;
        let handle = self.store(value);
        debug!(%handle, "Ciphertext materialized");
        Ok(handle)
    }

    async fn grant_compute(&self, handle: CiphertextHandle) -> Result<(), GatewayError> {
        self.grant(handle, Permission::Compute)
    }

    async fn grant_disclosure(&self, handle: CiphertextHandle) -> Result<(), GatewayError> {
        self.grant(handle, Permission::Disclose)
    }

    async fn equals(
        &self,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<CiphertextHandle, GatewayError> {
        let left = self.value_with(a, Permission::Compute)?;
        let right = self.value_with(b, Permission::Compute)?;
        let result = self.store(u64::from(left == right));
        debug!(%a, %b, %result, "Equality evaluated");
        Ok(result)
    }

    async fn disclose(&self, handle: CiphertextHandle) -> Result<u64, GatewayError> {
        let value = self.value_with(handle, Permission::Disclose)?;
        if let Some(delay) = self.disclosure_delay {
            tokio::time::sleep(delay).await;
        }
        debug!(%handle, "Handle disclosed");
        Ok(value)
    }
}
