//! # Event Log Scenarios
//!
//! What an external indexer sees: live subscriptions filtered by topic and
//! backfill from the ordered history.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cl_02_filter_registry::FilterRegistryApi;
    use cl_03_filter_engine::FilterEngineApi;
    use ledger_runtime::{LedgerConfig, LedgerQueryApi};
    use shared_bus::{EventFilter, EventTopic, LedgerEvent};
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use crate::integration::{local_ledger, register, send, ALICE, BOB, CAROL};

    #[tokio::test]
    async fn test_event_log_follows_mutation_order() {
        let (local, ledger) = local_ledger(LedgerConfig::default());

        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;
        // Toggles are not logged.
        ledger.filters().toggle_filter(CAROL, f).await.unwrap();
        ledger.filters().toggle_filter(CAROL, f).await.unwrap();
        ledger.engine().apply_filter(CAROL, m, f).await.unwrap();

        let log = ledger.events_since(0).await;
        let sequences: Vec<u64> = log.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(
            log[0].event,
            LedgerEvent::MessageCreated {
                id: m,
                sender: ALICE,
                receiver: BOB
            }
        );
        assert_eq!(log[1].event, LedgerEvent::FilterCreated { id: f, creator: CAROL });
        assert_eq!(
            log[2].event,
            LedgerEvent::FilterApplied {
                message_id: m,
                filter_id: f,
                result: 1
            }
        );
    }

    #[tokio::test]
    async fn test_topic_subscription_sees_only_applications() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let mut sub = ledger
            .event_bus()
            .subscribe(EventFilter::topics(vec![EventTopic::FilterApplication]));

        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 6).await;
        ledger.engine().apply_filter(CAROL, m, f).await.unwrap();

        let event = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout waiting for event")
            .expect("bus open");
        assert_eq!(event.sequence, 2);
        assert!(matches!(event.event, LedgerEvent::FilterApplied { result: 0, .. }));
        assert_eq!(sub.last_sequence(), Some(2));
    }

    #[tokio::test]
    async fn test_late_indexer_backfills_then_streams() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        send(&ledger, &local, ALICE, BOB, 1).await;
        send(&ledger, &local, ALICE, BOB, 2).await;

        // Subscribe first, then backfill, so nothing falls in between.
        let mut stream = ledger.event_bus().event_stream(EventFilter::all());
        let backfill = ledger.events_since(0).await;
        assert_eq!(backfill.len(), 2);

        send(&ledger, &local, BOB, ALICE, 3).await;
        let live = timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timeout waiting for event")
            .expect("stream open");
        assert_eq!(live.sequence, backfill.len() as u64);
    }

    #[tokio::test]
    async fn test_every_filtered_message_has_one_applied_event() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let hit = register(&ledger, &local, CAROL, "invoice", 5).await;
        let miss = register(&ledger, &local, CAROL, "lottery", 7).await;

        let mut messages = Vec::new();
        for value in [5, 7, 5, 9] {
            messages.push(send(&ledger, &local, ALICE, BOB, value).await);
        }
        ledger.engine().apply_filter(CAROL, messages[0], hit).await.unwrap();
        ledger.engine().apply_filter(CAROL, messages[1], miss).await.unwrap();
        ledger.engine().apply_filter(CAROL, messages[2], miss).await.unwrap();
        ledger.engine().apply_filter(CAROL, messages[0], miss).await.unwrap_err();

        let applied: Vec<LedgerEvent> = ledger
            .events_since(0)
            .await
            .into_iter()
            .map(|e| e.event)
            .filter(|e| matches!(e, LedgerEvent::FilterApplied { .. }))
            .collect();
        assert_eq!(applied.len(), 3);

        // Each terminal message references a registered filter, carries a
        // boolean result and is mirrored by exactly one log entry.
        let filter_count = ledger.filter_count().await;
        for id in messages {
            let message = ledger.get_message(id).await.unwrap();
            let logged: Vec<&LedgerEvent> = applied
                .iter()
                .filter(|e| matches!(e, LedgerEvent::FilterApplied { message_id, .. } if *message_id == id))
                .collect();
            match message.applied_filter() {
                Some(filter_id) => {
                    assert!(filter_id.as_u64() < filter_count);
                    assert!(message.filter_result() <= 1);
                    assert_eq!(
                        logged,
                        vec![&LedgerEvent::FilterApplied {
                            message_id: id,
                            filter_id,
                            result: message.filter_result()
                        }]
                    );
                }
                None => assert!(logged.is_empty()),
            }
        }
    }
}
