//! # Concurrency Scenarios
//!
//! Racing creations and applications, suspended disclosures and the
//! decryption oracle.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use cl_03_filter_engine::FilterEngineApi;
    use cl_ciphertext_gateway::backends::local::LocalGateway;
    use cl_ciphertext_gateway::backends::oracle::OracleGateway;
    use ledger_runtime::{Ledger, LedgerConfig, LedgerQueryApi};
    use shared_bus::LedgerEvent;
    use shared_types::{FixedTimeSource, GatewayError, LedgerError, MessageId};

    use crate::integration::{local_ledger, register, send, ALICE, BOB, CAROL};

    fn oracle_ledger(
        config: LedgerConfig,
    ) -> (
        Arc<LocalGateway>,
        cl_ciphertext_gateway::backends::oracle::DecryptionOracle<LocalGateway>,
        Arc<Ledger<OracleGateway<LocalGateway>>>,
    ) {
        let local = Arc::new(LocalGateway::new([0x42; 32]));
        let (gateway, oracle) = OracleGateway::new(Arc::clone(&local), 32);
        let ledger = Ledger::with_time_source(
            config,
            Arc::new(gateway),
            Arc::new(FixedTimeSource::new(0)),
        );
        (local, oracle, Arc::new(ledger))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_get_dense_ids() {
        let (local, ledger) = local_ledger(LedgerConfig::default());

        let mut tasks = Vec::new();
        for value in 0..32u64 {
            let ledger = Arc::clone(&ledger);
            let local = Arc::clone(&local);
            tasks.push(tokio::spawn(async move {
                send(&ledger, &local, ALICE, BOB, value).await
            }));
        }

        let mut ids = HashSet::new();
        for task in tasks {
            ids.insert(task.await.unwrap().as_u64());
        }
        assert_eq!(ids, (0..32).collect::<HashSet<_>>());
        assert_eq!(ledger.message_count().await, 32);

        // Event order matches id order.
        let created: Vec<u64> = ledger
            .events_since(0)
            .await
            .into_iter()
            .filter_map(|e| match e.event {
                LedgerEvent::MessageCreated { id, .. } => Some(id.as_u64()),
                _ => None,
            })
            .collect();
        assert_eq!(created, (0..32).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_racing_applications_exactly_one_wins() {
        let local = Arc::new(
            LocalGateway::new([0x42; 32]).with_disclosure_delay(Duration::from_millis(20)),
        );
        let ledger = Arc::new(Ledger::with_time_source(
            LedgerConfig::default(),
            Arc::clone(&local),
            Arc::new(FixedTimeSource::new(0)),
        ));
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let hit = register(&ledger, &local, CAROL, "invoice", 5).await;
        let miss = register(&ledger, &local, CAROL, "lottery", 6).await;

        let mut tasks = Vec::new();
        for i in 0..10 {
            let ledger = Arc::clone(&ledger);
            let filter = if i % 2 == 0 { hit } else { miss };
            tasks.push(tokio::spawn(async move {
                ledger.engine().apply_filter(CAROL, m, filter).await
            }));
        }

        let mut winners = Vec::new();
        for task in tasks {
            match task.await.unwrap() {
                Ok(result) => winners.push(result),
                Err(e) => assert_eq!(e, LedgerError::AlreadyFiltered(m)),
            }
        }
        assert_eq!(winners.len(), 1);

        // The persisted result belongs to whichever filter won.
        let message = ledger.get_message(m).await.unwrap();
        let expected = if message.applied_filter() == Some(hit) { 1 } else { 0 };
        assert_eq!(message.filter_result(), expected);
        assert_eq!(winners[0], expected);

        let applied = ledger
            .events_since(0)
            .await
            .into_iter()
            .filter(|e| matches!(e.event, LedgerEvent::FilterApplied { .. }))
            .count();
        assert_eq!(applied, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_then_retry_after_oracle_starts() {
        let mut config = LedgerConfig::default();
        config.engine.disclosure_timeout = Duration::from_millis(500);
        let (local, oracle, ledger) = oracle_ledger(config);

        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;

        let err = ledger.engine().apply_filter(CAROL, m, f).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::DisclosureTimeout { message_id: MessageId(0), .. }
        ));
        assert!(err.is_retryable());
        assert!(!ledger.get_message(m).await.unwrap().is_filtered());
        assert_eq!(ledger.events_since(2).await.len(), 0);

        let _oracle = oracle.spawn();
        assert_eq!(ledger.engine().apply_filter(CAROL, m, f).await, Ok(1));
        assert!(ledger.get_message(m).await.unwrap().is_filtered());
    }

    #[tokio::test]
    async fn test_oracle_serves_applications() {
        let (local, oracle, ledger) = oracle_ledger(LedgerConfig::default());
        let _oracle = oracle.spawn();

        let f = register(&ledger, &local, CAROL, "invoice", 5).await;
        let mut results = Vec::new();
        for value in [5, 4, 5] {
            let m = send(&ledger, &local, ALICE, BOB, value).await;
            results.push(ledger.engine().apply_filter(CAROL, m, f).await.unwrap());
        }
        assert_eq!(results, vec![1, 0, 1]);
    }

    #[tokio::test]
    async fn test_oracle_shutdown_surfaces_gateway_error() {
        let (local, oracle, ledger) = oracle_ledger(LedgerConfig::default());
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;
        drop(oracle);

        let err = ledger.engine().apply_filter(CAROL, m, f).await.unwrap_err();
        assert_eq!(err, LedgerError::Gateway(GatewayError::OracleUnavailable));
        assert!(err.is_retryable());
        assert!(!ledger.get_message(m).await.unwrap().is_filtered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_not_blocked_by_pending_disclosure() {
        let (local, _paused_oracle, ledger) = oracle_ledger(LedgerConfig::default());
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;

        let pending = {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.engine().apply_filter(CAROL, m, f).await })
        };
        tokio::task::yield_now().await;

        // No lock is held across the disclosure wait.
        let other = send(&ledger, &local, BOB, ALICE, 9).await;
        assert_eq!(other, MessageId(1));
        assert!(!ledger.get_message(m).await.unwrap().is_filtered());

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());
        assert!(!ledger.get_message(m).await.unwrap().is_filtered());
    }
}
