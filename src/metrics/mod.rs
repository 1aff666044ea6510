// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry};

// Re-export for public API
pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Customer API requests by operation and outcome
// - Store call latency
// - Number of stored customer records (as last observed)
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the service
pub struct Metrics {
    registry: Registry,

    pub requests_total: IntCounterVec,
    pub store_duration: HistogramVec,
    pub customer_records: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("customer_requests_total", "Total customer API requests"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let store_duration = HistogramVec::new(
            HistogramOpts::new("customer_store_duration_seconds", "Customer store call duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["operation"],
        )?;
        registry.register(Box::new(store_duration.clone()))?;

        let customer_records = IntGauge::new(
            "customer_records",
            "Customer records seen by the last list or bulk delete",
        )?;
        registry.register(Box::new(customer_records.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            store_duration,
            customer_records,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_request(&self, operation: &str, outcome: &str) {
        self.requests_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn observe_store(&self, operation: &str, seconds: f64) {
        self.store_duration
            .with_label_values(&[operation])
            .observe(seconds);
    }
}
