//! Prometheus metrics for the Cipher-Ledger subsystems.
//!
//! All metrics follow the naming convention: `cl_<subsystem>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., messages_submitted_total)
//! - **Gauge**: Value that can go up or down (e.g., messages_stored)
//! - **Histogram**: Distribution of values (e.g., disclosure_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry. Every metric below is registered on first use.
    pub static ref REGISTRY: Registry = {
        let registry = Registry::new();
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            // Message store
            Box::new(MESSAGES_SUBMITTED.clone()),
            Box::new(MESSAGES_STORED.clone()),
            // Filter registry
            Box::new(FILTERS_CREATED.clone()),
            Box::new(FILTERS_STORED.clone()),
            Box::new(FILTER_TOGGLES.clone()),
            // Filter engine
            Box::new(FILTERS_APPLIED.clone()),
            Box::new(DISCLOSURE_DURATION.clone()),
            // Errors
            Box::new(REJECTED_OPERATIONS.clone()),
        ];
        for collector in collectors {
            registry.register(collector).expect("metric registration failed");
        }
        registry
    };

    // =========================================================================
    // MESSAGE STORE METRICS (Subsystem 1)
    // =========================================================================

    /// Total messages accepted
    pub static ref MESSAGES_SUBMITTED: Counter = Counter::new(
        "cl_store_messages_submitted_total",
        "Total number of messages accepted by the message store"
    ).expect("metric creation failed");

    /// Current message count
    pub static ref MESSAGES_STORED: Gauge = Gauge::new(
        "cl_store_messages_stored",
        "Number of messages allocated"
    ).expect("metric creation failed");

    // =========================================================================
    // FILTER REGISTRY METRICS (Subsystem 2)
    // =========================================================================

    /// Total filters registered
    pub static ref FILTERS_CREATED: Counter = Counter::new(
        "cl_registry_filters_created_total",
        "Total number of filters registered"
    ).expect("metric creation failed");

    /// Current filter count
    pub static ref FILTERS_STORED: Gauge = Gauge::new(
        "cl_registry_filters_stored",
        "Number of filters allocated"
    ).expect("metric creation failed");

    /// Filter toggles by resulting state
    pub static ref FILTER_TOGGLES: CounterVec = CounterVec::new(
        Opts::new("cl_registry_filter_toggles_total", "Filter toggles"),
        &["state"]  // state: active/inactive
    ).expect("metric creation failed");

    // =========================================================================
    // FILTER ENGINE METRICS (Subsystem 3)
    // =========================================================================

    /// Successful filter applications by disclosed result
    pub static ref FILTERS_APPLIED: CounterVec = CounterVec::new(
        Opts::new("cl_engine_filters_applied_total", "Filters applied to messages"),
        &["outcome"]  // outcome: match/no_match
    ).expect("metric creation failed");

    /// Time spent waiting for disclosure
    pub static ref DISCLOSURE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cl_engine_disclosure_duration_seconds",
            "Time spent waiting for the gateway to disclose a filter result"
        ).buckets(exponential_buckets(0.0001, 2.0, 20).unwrap_or_default())
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref REJECTED_OPERATIONS: CounterVec = CounterVec::new(
        Opts::new("cl_rejected_operations_total", "Operations rejected with an error"),
        &["operation", "kind"]
    ).expect("metric creation failed");
}

/// Force registration of every metric with [`REGISTRY`].
pub fn register_metrics() {
    lazy_static::initialize(&REGISTRY);
}

/// Record a message accepted by the store.
pub fn record_message_submitted(message_count: u64) {
    MESSAGES_SUBMITTED.inc();
    MESSAGES_STORED.set(message_count as f64);
}

/// Record a filter registered.
pub fn record_filter_created(filter_count: u64) {
    FILTERS_CREATED.inc();
    FILTERS_STORED.set(filter_count as f64);
}

/// Record a toggle and the state it produced.
pub fn record_filter_toggled(active: bool) {
    let state = if active { "active" } else { "inactive" };
    FILTER_TOGGLES.with_label_values(&[state]).inc();
}

/// Record a persisted filter result.
pub fn record_filter_applied(result: u64) {
    let outcome = if result == 0 { "no_match" } else { "match" };
    FILTERS_APPLIED.with_label_values(&[outcome]).inc();
}

/// Record how long a disclosure took (successful or not).
pub fn record_disclosure(duration: std::time::Duration) {
    DISCLOSURE_DURATION.observe(duration.as_secs_f64());
}

/// Record an operation that returned an error.
pub fn record_rejection(operation: &str, kind: &str) {
    REJECTED_OPERATIONS
        .with_label_values(&[operation, kind])
        .inc();
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
