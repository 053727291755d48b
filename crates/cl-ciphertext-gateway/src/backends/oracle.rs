//! Oracle gateway backend
//!
//! Wraps another gateway and moves disclosure onto a separate decryption
//! oracle task. Each `disclose` enqueues a request carrying a oneshot reply
//! channel and awaits the answer, which is how a threshold decryption network
//! or KMS responds in practice.
//!
//! ```text
//! disclose() ──DisclosureRequest──→ [mpsc queue] ──→ DecryptionOracle
//!     ↑                                                   │
//!     └─────────────── oneshot reply ─────────────────────┘
//! ```
//!
//! An oracle that is constructed but never run models a disclosure that does
//! not complete. Dropping the oracle fails pending and future disclosures
//! with [`GatewayError::OracleUnavailable`].

use crate::{Backend, CiphertextGateway};
use async_trait::async_trait;
use shared_types::{CiphertextHandle, CiphertextInput, GatewayError, InputProof};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A pending disclosure waiting for the oracle.
pub struct DisclosureRequest {
    pub request_id: Uuid,
    pub handle: CiphertextHandle,
    reply: oneshot::Sender<Result<u64, GatewayError>>,
}

/// Gateway whose `disclose` is served by a [`DecryptionOracle`].
pub struct OracleGateway<G: ?Sized> {
    inner: Arc<G>,
    requests: mpsc::Sender<DisclosureRequest>,
}

impl<G: CiphertextGateway + ?Sized> OracleGateway<G> {
    /// Create the gateway together with the oracle that must serve it.
    ///
    /// `queue_depth` bounds how many disclosures can wait before callers
    /// start suspending on the enqueue itself.
    pub fn new(inner: Arc<G>, queue_depth: usize) -> (Self, DecryptionOracle<G>) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let oracle = DecryptionOracle {
            inner: Arc::clone(&inner),
            requests: rx,
            served: 0,
        };
        (Self { inner, requests: tx }, oracle)
    }

    /// The wrapped gateway.
    #[must_use]
    pub fn inner(&self) -> &Arc<G> {
        &self.inner
    }
}

#[async_trait]
impl<G: CiphertextGateway + ?Sized> CiphertextGateway for OracleGateway<G> {
    fn backend(&self) -> Backend {
        Backend::Oracle
    }

    async fn materialize(
        &self,
        input: &CiphertextInput,
        proof: &InputProof,
    ) -> Result<CiphertextHandle, GatewayError> {
        self.inner.materialize(input, proof).await
    }

    async fn grant_compute(&self, handle: CiphertextHandle) -> Result<(), GatewayError> {
        self.inner.grant_compute(handle).await
    }

    async fn grant_disclosure(&self, handle: CiphertextHandle) -> Result<(), GatewayError> {
        self.inner.grant_disclosure(handle).await
    }

    async fn equals(
        &self,
        a: CiphertextHandle,
        b: CiphertextHandle,
    ) -> Result<CiphertextHandle, GatewayError> {
        self.inner.equals(a, b).await
    }

    async fn disclose(&self, handle: CiphertextHandle) -> Result<u64, GatewayError> {
        let request_id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();

        self.requests
            .send(DisclosureRequest {
                request_id,
                handle,
                reply: tx,
            })
            .await
            .map_err(|_| GatewayError::OracleUnavailable)?;
        debug!(%request_id, %handle, "Disclosure requested");

        rx.await.map_err(|_| GatewayError::OracleUnavailable)?
    }
}

/// Serves disclosure requests queued by an [`OracleGateway`].
pub struct DecryptionOracle<G: ?Sized> {
    inner: Arc<G>,
    requests: mpsc::Receiver<DisclosureRequest>,
    served: u64,
}

impl<G: CiphertextGateway + ?Sized> DecryptionOracle<G> {
    /// Answer the next queued request.
    ///
    /// Returns `false` once every `OracleGateway` handle is gone.
    pub async fn serve_next(&mut self) -> bool {
        let Some(request) = self.requests.recv().await else {
            return false;
        };

        let result = self.inner.disclose(request.handle).await;
        if let Err(e) = &result {
            warn!(request_id = %request.request_id, error = %e, "Disclosure failed");
        }
        if request.reply.send(result).is_err() {
            // Requester gave up (timeout or cancellation).
            debug!(request_id = %request.request_id, "Disclosure reply dropped");
        }
        self.served += 1;
        true
    }

    /// Serve requests until the gateway side is dropped.
    pub async fn run(mut self) {
        info!("Decryption oracle started");
        while self.serve_next().await {}
        info!(served = self.served, "Decryption oracle stopped");
    }

    /// Number of requests answered so far.
    #[must_use]
    pub fn served(&self) -> u64 {
        self.served
    }
}

impl<G: CiphertextGateway + ?Sized + 'static> DecryptionOracle<G> {
    /// Run the oracle on the current tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
