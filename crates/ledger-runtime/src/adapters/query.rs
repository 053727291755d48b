//! # JSON Query Handler
//!
//! Maps JSON-RPC style `(method, params)` pairs onto [`LedgerQueryApi`].
//!
//! ## Methods
//!
//! | Method | Params | Result |
//! |--------|--------|--------|
//! | `get_message` | `{"id": u64}` | message object |
//! | `get_filter` | `{"id": u64}` | filter object |
//! | `get_user_messages` | `{"party": hex}` | `[u64]` |
//! | `get_user_filters` | `{"creator": hex}` | `[u64]` |
//! | `message_count` | - | `u64` |
//! | `filter_count` | - | `u64` |
//! | `is_filter_active` | `{"id": u64}` | `bool` |
//! | `get_events` | `{"since": u64}` (optional) | `[event]` |
//! | `get_metrics` | - | Prometheus text |
//!
//! Party ids are 32-byte hex strings, with or without `0x`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use shared_types::{ErrorKind, FilterId, FilterRule, LedgerError, Message, MessageId, PartyId};

use crate::query::LedgerQueryApi;

/// Method not found.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Missing or malformed params.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal failure (metrics encoding, serialization).
pub const INTERNAL_ERROR: i32 = -32000;
/// Requested record does not exist.
pub const NOT_FOUND: i32 = -32004;

/// Error returned to JSON callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message} (code {code})")]
pub struct ApiQueryError {
    pub code: i32,
    pub message: String,
}

impl ApiQueryError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<LedgerError> for ApiQueryError {
    fn from(e: LedgerError) -> Self {
        let code = match e.kind() {
            ErrorKind::NotFound => NOT_FOUND,
            _ => INTERNAL_ERROR,
        };
        Self::new(code, e.to_string())
    }
}

/// Routes JSON queries to the ledger.
pub struct QueryHandler<Q: ?Sized> {
    ledger: Arc<Q>,
}

impl<Q: LedgerQueryApi + ?Sized> QueryHandler<Q> {
    pub fn new(ledger: Arc<Q>) -> Self {
        Self { ledger }
    }

    /// Process one query.
    #[instrument(skip(self, params), name = "query")]
    pub async fn handle(&self, method: &str, params: &Value) -> Result<Value, ApiQueryError> {
        let result = self.dispatch(method, params).await;
        match &result {
            Ok(_) => debug!("Query served"),
            Err(e) => warn!(code = e.code, error = %e.message, "Query failed"),
        }
        result
    }

    async fn dispatch(&self, method: &str, params: &Value) -> Result<Value, ApiQueryError> {
        match method {
            "get_message" => {
                let id = MessageId(id_param(params, "id")?);
                let message = self.ledger.get_message(id).await?;
                Ok(message_json(&message))
            }
            "get_filter" => {
                let id = FilterId(id_param(params, "id")?);
                let rule = self.ledger.get_filter(id).await?;
                Ok(filter_json(&rule))
            }
            "get_user_messages" => {
                let party = party_param(params, "party")?;
                let ids = self.ledger.get_user_messages(party).await;
                Ok(json!(ids.iter().map(|id| id.as_u64()).collect::<Vec<_>>()))
            }
            "get_user_filters" => {
                let creator = party_param(params, "creator")?;
                let ids = self.ledger.get_user_filters(creator).await;
                Ok(json!(ids.iter().map(|id| id.as_u64()).collect::<Vec<_>>()))
            }
            "message_count" => Ok(json!(self.ledger.message_count().await)),
            "filter_count" => Ok(json!(self.ledger.filter_count().await)),
            "is_filter_active" => {
                let id = FilterId(id_param(params, "id")?);
                Ok(json!(self.ledger.is_filter_active(id).await?))
            }
            "get_events" => {
                let since = optional_id_param(params, "since")?.unwrap_or(0);
                let events = self.ledger.events_since(since).await;
                serde_json::to_value(events)
                    .map_err(|e| ApiQueryError::new(INTERNAL_ERROR, e.to_string()))
            }
            "get_metrics" => ledger_telemetry::gather_metrics()
                .map(Value::String)
                .map_err(|e| ApiQueryError::new(INTERNAL_ERROR, e.to_string())),
            _ => Err(ApiQueryError::new(
                METHOD_NOT_FOUND,
                format!("Unknown ledger method: {}", method),
            )),
        }
    }
}

fn id_param(params: &Value, name: &str) -> Result<u64, ApiQueryError> {
    params
        .get(name)
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiQueryError::new(INVALID_PARAMS, format!("Missing '{}' parameter", name)))
}

/// Absent or `null` is `None`; anything else must be a `u64`.
fn optional_id_param(params: &Value, name: &str) -> Result<Option<u64>, ApiQueryError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ApiQueryError::new(INVALID_PARAMS, format!("Invalid '{}' parameter: {}", name, value))
        }),
    }
}

fn party_param(params: &Value, name: &str) -> Result<PartyId, ApiQueryError> {
    let raw = params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiQueryError::new(INVALID_PARAMS, format!("Missing '{}' parameter", name)))?;
    let hex = raw.strip_prefix("0x").unwrap_or(raw);
    PartyId::from_hex(hex).map_err(|e| {
        ApiQueryError::new(INVALID_PARAMS, format!("Invalid '{}' parameter: {}", name, e))
    })
}

fn message_json(message: &Message) -> Value {
    json!({
        "id": message.id.as_u64(),
        "sender": format!("0x{}", message.sender.to_hex()),
        "receiver": format!("0x{}", message.receiver.to_hex()),
        "content": format!("0x{}", message.content.to_hex()),
        "created_at": message.created_at,
        "filtered": message.is_filtered(),
        "filter_result": message.filter_result(),
        "applied_filter": message.applied_filter().map(FilterId::as_u64),
    })
}

fn filter_json(rule: &FilterRule) -> Value {
    json!({
        "id": rule.id.as_u64(),
        "creator": format!("0x{}", rule.creator.to_hex()),
        "keyword": rule.keyword,
        "pattern": format!("0x{}", rule.pattern.to_hex()),
        "created_at": rule.created_at,
        "active": rule.is_active(),
    })
}
