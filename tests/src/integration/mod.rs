//! # Integration Scenarios
//!
//! Every scenario runs against a [`ledger_runtime::Ledger`] wired over the
//! local gateway, optionally behind a decryption oracle.

pub mod concurrency;
pub mod event_log;
pub mod flows;
pub mod queries;

use std::sync::Arc;

use cl_01_message_store::MessageStoreApi;
use cl_02_filter_registry::FilterRegistryApi;
use cl_ciphertext_gateway::backends::local::LocalGateway;
use cl_ciphertext_gateway::CiphertextGateway;
use ledger_runtime::{Ledger, LedgerConfig};
use shared_types::{FilterId, FixedTimeSource, MessageId, PartyId};

pub const ALICE: PartyId = PartyId([0xA1; 32]);
pub const BOB: PartyId = PartyId([0xB0; 32]);
pub const CAROL: PartyId = PartyId([0xCA; 32]);

/// Ledger over a fresh local gateway with a fixed clock.
pub fn local_ledger(config: LedgerConfig) -> (Arc<LocalGateway>, Arc<Ledger<LocalGateway>>) {
    let local = Arc::new(LocalGateway::new([0x42; 32]));
    let ledger = Ledger::with_time_source(
        config,
        Arc::clone(&local),
        Arc::new(FixedTimeSource::new(1_700_000_000)),
    );
    (local, Arc::new(ledger))
}

/// Encrypt `value` with `local` and submit it as a message.
pub async fn send<G: CiphertextGateway + ?Sized>(
    ledger: &Ledger<G>,
    local: &LocalGateway,
    sender: PartyId,
    receiver: PartyId,
    value: u64,
) -> MessageId {
    let (input, proof) = local.encrypt(value);
    ledger
        .messages()
        .submit_message(sender, receiver, input, proof)
        .await
        .expect("message accepted")
}

/// Encrypt `value` with `local` and register it as a filter pattern.
pub async fn register<G: CiphertextGateway + ?Sized>(
    ledger: &Ledger<G>,
    local: &LocalGateway,
    creator: PartyId,
    keyword: &str,
    value: u64,
) -> FilterId {
    let (input, proof) = local.encrypt(value);
    ledger
        .filters()
        .create_filter(creator, keyword.to_string(), input, proof)
        .await
        .expect("filter accepted")
}
