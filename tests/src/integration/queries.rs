//! # Query Adapter Scenarios
//!
//! The JSON view of a ledger after a full filtering round.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cl_02_filter_registry::FilterRegistryApi;
    use cl_03_filter_engine::FilterEngineApi;
    use ledger_runtime::adapters::query::{INVALID_PARAMS, METHOD_NOT_FOUND, NOT_FOUND};
    use ledger_runtime::{LedgerConfig, QueryHandler};
    use serde_json::{json, Value};

    use crate::integration::{local_ledger, register, send, ALICE, BOB, CAROL};

    #[tokio::test]
    async fn test_json_view_tracks_lifecycle() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let queries = QueryHandler::new(Arc::clone(&ledger));

        let m = send(&ledger, &local, ALICE, BOB, 5).await;
        let f = register(&ledger, &local, CAROL, "invoice", 5).await;

        let before = queries.handle("get_message", &json!({"id": 0})).await.unwrap();
        assert_eq!(before["filtered"], false);
        assert_eq!(before["applied_filter"], Value::Null);
        assert_eq!(before["created_at"], 1_700_000_000u64);

        ledger.engine().apply_filter(CAROL, m, f).await.unwrap();
        ledger.filters().toggle_filter(CAROL, f).await.unwrap();

        let after = queries.handle("get_message", &json!({"id": 0})).await.unwrap();
        assert_eq!(after["filtered"], true);
        assert_eq!(after["filter_result"], 1);

        let filter = queries.handle("get_filter", &json!({"id": 0})).await.unwrap();
        assert_eq!(filter["active"], false);
        assert_eq!(filter["creator"], format!("0x{}", CAROL.to_hex()));

        let events = queries.handle("get_events", &Value::Null).await.unwrap();
        assert_eq!(events.as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn test_json_errors() {
        let (local, ledger) = local_ledger(LedgerConfig::default());
        let queries = QueryHandler::new(Arc::clone(&ledger));
        send(&ledger, &local, ALICE, BOB, 5).await;

        let err = queries
            .handle("is_filter_active", &json!({"id": 0}))
            .await
            .unwrap_err();
        assert_eq!(err.code, NOT_FOUND);

        let err = queries
            .handle("get_user_filters", &json!({"creator": "abcd"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);

        let err = queries.handle("toggle_filter", &Value::Null).await.unwrap_err();
        assert_eq!(err.code, METHOD_NOT_FOUND);
    }
}
