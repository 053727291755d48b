//! # Adapter Implementations
//!
//! Outer-layer adapters that expose the ledger to external callers.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  OUTER LAYER (Adapters)      QueryHandler (JSON)         │
//! │                                   │ uses                 │
//! │  MIDDLE LAYER (Ports)        LedgerQueryApi              │
//! │                                   │ implemented by       │
//! │  CONTAINER                   Ledger<G>                   │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod query;

pub use query::{ApiQueryError, QueryHandler};
