//! # Cipher-Ledger
//!
//! Demonstration runtime: wires the ledger over a local gateway served by a
//! decryption oracle, runs one filtering round and prints the event log.
//!
//! ## Flow
//!
//! 1. Load configuration from `CL_*` environment variables
//! 2. Initialize telemetry
//! 3. Start the decryption oracle
//! 4. Alice sends Bob an encrypted message, Carol registers two filters
//! 5. Carol's matching filter is applied, then a second application is
//!    rejected as already filtered
//! 6. Dump the event log and the query view of the message

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{info, warn};

use cl_01_message_store::MessageStoreApi;
use cl_02_filter_registry::FilterRegistryApi;
use cl_03_filter_engine::FilterEngineApi;
use cl_ciphertext_gateway::backends::local::LocalGateway;
use cl_ciphertext_gateway::backends::oracle::OracleGateway;
use ledger_runtime::{Ledger, LedgerConfig, QueryHandler};
use shared_types::PartyId;

const ORACLE_QUEUE_DEPTH: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    let config = LedgerConfig::from_env().context("Failed to load ledger configuration")?;
    let _telemetry =
        ledger_telemetry::init_telemetry(&config.telemetry).context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  Cipher-Ledger Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let local = Arc::new(LocalGateway::random());
    let (gateway, oracle) = OracleGateway::new(Arc::clone(&local), ORACLE_QUEUE_DEPTH);
    let oracle_task = oracle.spawn();
    let ledger = Arc::new(Ledger::new(config, Arc::new(gateway)));

    let alice = PartyId([0xA1; 32]);
    let bob = PartyId([0xB0; 32]);
    let carol = PartyId([0xCA; 32]);

    let (input, proof) = local.encrypt(5);
    let message = ledger
        .messages()
        .submit_message(alice, bob, input, proof)
        .await
        .context("Message submission failed")?;

    let (input, proof) = local.encrypt(7);
    let miss = ledger
        .filters()
        .create_filter(carol, "lottery".to_string(), input, proof)
        .await
        .context("Filter registration failed")?;
    let (input, proof) = local.encrypt(5);
    let hit = ledger
        .filters()
        .create_filter(carol, "invoice".to_string(), input, proof)
        .await
        .context("Filter registration failed")?;

    // Switch the non-matching filter off; applying it would be rejected.
    ledger.filters().toggle_filter(carol, miss).await?;

    let result = ledger
        .engine()
        .apply_filter(carol, message, hit)
        .await
        .context("Filter application failed")?;
    info!(%message, filter = %hit, result, "Filter result disclosed");

    match ledger.engine().apply_filter(carol, message, hit).await {
        Ok(_) => warn!(%message, "Message was filtered twice"),
        Err(e) => info!(%message, error = %e, "Second application rejected"),
    }

    for entry in ledger.event_bus().history() {
        info!(sequence = entry.sequence, event = ?entry.event, "Event log");
    }

    let queries = QueryHandler::new(Arc::clone(&ledger));
    let view = queries
        .handle("get_message", &json!({ "id": message.as_u64() }))
        .await?;
    info!(message = %view, "Query view");

    drop(queries);
    drop(ledger);
    oracle_task.await.context("Decryption oracle task failed")?;
    info!("Shutdown complete");
    Ok(())
}
