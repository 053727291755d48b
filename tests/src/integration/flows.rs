//! # Ledger Flows
//!
//! End-to-end message lifecycles across the Message Store (1), the Filter
//! Registry (2) and the Filter Application Engine (3).
//!
//! ```text
//! submit_message ──→ [Created] ──apply_filter──→ [Filtered]
//!                          ↑
//! create_filter ── active ─┘  (toggle_filter gates new applications only)
//! ```

#[cfg(test)]
mod tests {
    use cl_01_message_store::MessageStoreApi;
    use cl_02_filter_registry::{FilterRegistryApi, ToggleAuthorization};
    use cl_03_filter_engine::{ApplyAuthorization, FilterEngineApi};
    use cl_ciphertext_gateway::backends::local::LocalGateway;
    use ledger_runtime::{LedgerConfig, LedgerQueryApi};
    use shared_types::{FilterId, LedgerError, MessageId, MessageState, PartyId};

    use crate::integration::{local_ledger, register, send, ALICE, BOB, CAROL};

    // =============================================================================
    // BASIC LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_matching_keyword_then_already_filtered() {
        let (local, ledger) = local_ledger(LedgerConfig::default());

        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;
        assert_eq!(m, MessageId(0));
        assert_eq!(f, FilterId(0));

        assert_eq!(ledger.engine().apply_filter(CAROL, m, f).await, Ok(1));
        assert_eq!(
            ledger.engine().apply_filter(CAROL, m, f).await,
            Err(LedgerError::AlreadyFiltered(m))
        );

        let message = ledger.get_message(m).await.unwrap();
        assert_eq!(
            message.state(),
            MessageState::Filtered {
                filter_id: f,
                result: 1
            }
        );
    }

    #[tokio::test]
    async fn test_non_matching_keyword_is_terminal_too() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let miss = register(&ledger, &local, CAROL, "lottery", 9).await;
        let hit = register(&ledger, &local, CAROL, "invoice", 5).await;

        assert_eq!(ledger.engine().apply_filter(CAROL, m, miss).await, Ok(0));
        assert_eq!(
            ledger.engine().apply_filter(CAROL, m, hit).await,
            Err(LedgerError::AlreadyFiltered(m))
        );
        assert_eq!(ledger.get_message(m).await.unwrap().filter_result(), 0);
    }

    #[tokio::test]
    async fn test_messages_filtered_independently() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;

        let mut ids = Vec::new();
        for value in [5, 6, 5, 7] {
            ids.push(send(&ledger, &local, ALICE, BOB, value).await);
        }

        let mut results = Vec::new();
        for id in &ids {
            results.push(ledger.engine().apply_filter(CAROL, *id, f).await.unwrap());
        }
        assert_eq!(results, vec![1, 0, 1, 0]);
    }

    // =============================================================================
    // FILTER ACTIVATION
    // =============================================================================

    #[tokio::test]
    async fn test_inactive_filter_rejected_until_reactivated() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;

        assert_eq!(ledger.filters().toggle_filter(CAROL, f).await, Ok(false));
        assert_eq!(
            ledger.engine().apply_filter(CAROL, m, f).await,
            Err(LedgerError::FilterInactive(f))
        );
        assert!(!ledger.get_message(m).await.unwrap().is_filtered());

        assert_eq!(ledger.filters().toggle_filter(CAROL, f).await, Ok(true));
        assert_eq!(ledger.engine().apply_filter(CAROL, m, f).await, Ok(1));
    }

    #[tokio::test]
    async fn test_deactivation_does_not_touch_filtered_messages() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;
        ledger.engine().apply_filter(CAROL, m, f).await.unwrap();

        ledger.filters().toggle_filter(CAROL, f).await.unwrap();

        let message = ledger.get_message(m).await.unwrap();
        assert!(message.is_filtered());
        assert_eq!(message.applied_filter(), Some(f));
        assert!(!ledger.is_filter_active(f).await.unwrap());
    }

    // =============================================================================
    // NOT FOUND / INVALID INPUT
    // =============================================================================

    #[tokio::test]
    async fn test_get_message_out_of_range() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        for value in 0..3 {
            send(&ledger, &local, ALICE, BOB, value).await;
        }

        assert_eq!(
            ledger.get_message(MessageId(5)).await,
            Err(LedgerError::MessageNotFound {
                id: MessageId(5),
                count: 3
            })
        );
        assert!(ledger.get_filter(FilterId(0)).await.is_err());
        assert!(ledger.is_filter_active(FilterId(0)).await.is_err());
    }

    #[tokio::test]
    async fn test_foreign_ciphertext_allocates_nothing() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let foreign = LocalGateway::new([0x99; 32]);

        let (input, proof) = foreign.encrypt(5);
        let err = ledger
            .messages()
            .submit_message(ALICE, BOB, input, proof)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidCiphertext { .. }));

        let (input, proof) = foreign.encrypt(5);
        assert!(ledger
            .filters()
            .create_filter(CAROL, "x".into(), input, proof)
            .await
            .is_err());

        assert_eq!(ledger.message_count().await, 0);
        assert_eq!(ledger.filter_count().await, 0);
        assert!(ledger.get_user_messages(ALICE).await.is_empty());
        assert!(ledger.events_since(0).await.is_empty());

        // The next accepted record still gets id 0.
        assert_eq!(send(&ledger, &local, ALICE, BOB, 5).await, MessageId(0));
    }

    // =============================================================================
    // INDEXES
    // =============================================================================

    #[tokio::test]
    async fn test_party_index_lists_both_roles() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let m0 = send(&ledger, &local, ALICE, BOB, 1).await;
        let m1 = send(&ledger, &local, BOB, CAROL, 2).await;
        let m2 = send(&ledger, &local, BOB, BOB, 3).await;

        assert_eq!(ledger.get_user_messages(ALICE).await, vec![m0]);
        assert_eq!(ledger.get_user_messages(BOB).await, vec![m0, m1, m2, m2]);
        assert_eq!(ledger.get_user_messages(CAROL).await, vec![m1]);
        assert!(ledger.get_user_messages(PartyId([0; 32])).await.is_empty());
    }

    #[tokio::test]
    async fn test_filter_and_message_counters_are_independent() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        send(&ledger, &local, ALICE, BOB, 1).await;
        send(&ledger, &local, ALICE, BOB, 2).await;
        let f = register(&ledger, &local, CAROL, "x", 1).await;

        assert_eq!(f, FilterId(0));
        assert_eq!(ledger.message_count().await, 2);
        assert_eq!(ledger.filter_count().await, 1);
        assert_eq!(ledger.get_user_filters(CAROL).await, vec![f]);
    }

    // =============================================================================
    // AUTHORIZATION POLICIES
    // =============================================================================

    #[tokio::test]
    async fn test_default_policies_currently_unauthenticated() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;
        let stranger = PartyId([0x5A; 32]);

        assert_eq!(ledger.filters().toggle_filter(stranger, f).await, Ok(false));
        assert_eq!(ledger.filters().toggle_filter(stranger, f).await, Ok(true));
        assert_eq!(ledger.engine().apply_filter(stranger, m, f).await, Ok(1));
    }

    #[tokio::test]
    async fn test_restrictive_policies() {
        let mut config = LedgerConfig::default();
        config.authorization.toggle = ToggleAuthorization::CreatorOnly;
        config.authorization.apply = ApplyAuthorization::ReceiverOnly;
        let (local, ledger) = local_ledger(config);

        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;

        assert!(matches!(
            ledger.filters().toggle_filter(BOB, f).await,
            Err(LedgerError::Unauthorized { .. })
        ));
        assert!(matches!(
            ledger.engine().apply_filter(CAROL, m, f).await,
            Err(LedgerError::Unauthorized { .. })
        ));
        assert_eq!(ledger.engine().apply_filter(BOB, m, f).await, Ok(1));
    }
}
