use prometheus::{Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    pub stats_queries: IntCounter,
    pub stats_rejected: IntCounter,
    pub store_failures: IntCounter,
    pub store_load_duration: Histogram,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let stats_queries =
            IntCounter::new("scholar_stats_queries_total", "Reviewer stats queries served")
                .expect("metric can be created");
        let stats_rejected = IntCounter::new(
            "scholar_stats_rejected_total",
            "Reviewer stats queries rejected before lookup",
        )
        .expect("metric can be created");
        let store_failures = IntCounter::new(
            "scholar_store_failures_total",
            "Review store reads that failed",
        )
        .expect("metric can be created");
        let store_load_duration = Histogram::with_opts(
            HistogramOpts::new(
                "scholar_store_load_duration_seconds",
                "Time spent reading the review store",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )
        .expect("metric can be created");

        registry
            .register(Box::new(stats_queries.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(stats_rejected.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(store_failures.clone()))
            .expect("collector can be registered");
        registry
            .register(Box::new(store_load_duration.clone()))
            .expect("collector can be registered");

        Self {
            registry,
            stats_queries,
            stats_rejected,
            store_failures,
            store_load_duration,
        }
    }

    /// Prometheus text exposition of every registered metric
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }
}
