//! # Cipher-Ledger Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | Local gateway | proof check + materialize, homomorphic equality |
//! | Message store | submission incl. gateway admission and event publish |
//! | Filter engine | full validate / equals / disclose / persist round |

use std::sync::Arc;
use std::time::Instant;

use cl_01_message_store::MessageStoreApi;
use cl_02_filter_registry::FilterRegistryApi;
use cl_03_filter_engine::FilterEngineApi;
use cl_ciphertext_gateway::backends::local::LocalGateway;
use cl_ciphertext_gateway::CiphertextGateway;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ledger_runtime::{Ledger, LedgerConfig};
use shared_types::PartyId;
use tokio::runtime::Runtime;

const ALICE: PartyId = PartyId([0xA1; 32]);
const BOB: PartyId = PartyId([0xB0; 32]);
const CAROL: PartyId = PartyId([0xCA; 32]);

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

fn bench_local_gateway(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("local-gateway");
    let gateway = &LocalGateway::new([7; 32]);

    group.bench_function("materialize", |b| {
        b.to_async(&rt).iter_batched(
            || gateway.encrypt(5),
            |(input, proof)| async move { black_box(gateway.materialize(&input, &proof).await) },
            BatchSize::SmallInput,
        )
    });

    let (left, right) = rt.block_on(async {
        let (a, pa) = gateway.encrypt(5);
        let (b, pb) = gateway.encrypt(5);
        let left = gateway.materialize(&a, &pa).await.expect("valid input");
        let right = gateway.materialize(&b, &pb).await.expect("valid input");
        gateway.grant_compute(left).await.expect("known handle");
        gateway.grant_compute(right).await.expect("known handle");
        (left, right)
    });
    group.bench_function("equals", |b| {
        b.to_async(&rt)
            .iter(|| async move { black_box(gateway.equals(left, right).await) })
    });

    group.finish();
}

fn bench_ledger(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("ledger");
    let local = Arc::new(LocalGateway::new([7; 32]));
    let ledger = &Ledger::new(LedgerConfig::default(), Arc::clone(&local));

    group.bench_function("submit_message", |b| {
        b.to_async(&rt).iter_batched(
            || local.encrypt(5),
            |(input, proof)| async move {
                black_box(ledger.messages().submit_message(ALICE, BOB, input, proof).await)
            },
            BatchSize::SmallInput,
        )
    });

    let filter = rt.block_on(async {
        let (input, proof) = local.encrypt(5);
        ledger
            .filters()
            .create_filter(CAROL, "invoice".to_string(), input, proof)
            .await
            .expect("valid pattern")
    });

    // Messages are submitted before the clock starts; only the application is timed.
    group.bench_function("apply_filter", |b| {
        b.to_async(&rt).iter_custom(|iters| {
            let local = Arc::clone(&local);
            async move {
                let mut messages = Vec::with_capacity(iters as usize);
                for _ in 0..iters {
                    let (input, proof) = local.encrypt(5);
                    let id = ledger
                        .messages()
                        .submit_message(ALICE, BOB, input, proof)
                        .await
                        .expect("valid message");
                    messages.push(id);
                }

                let start = Instant::now();
                for message in messages {
                    black_box(ledger.engine().apply_filter(CAROL, message, filter).await)
                        .expect("first application succeeds");
                }
                start.elapsed()
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_local_gateway, bench_ledger);
criterion_main!(benches);
