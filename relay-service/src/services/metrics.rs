use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static RELAY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static UPSTREAM_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

pub fn init_metrics() {
    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("relay_requests_total", "Total number of relay requests"),
        &["outcome"],
    )
    .expect("metric can be created");

    let upstream_duration = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "upstream_request_duration_seconds",
            "Upstream call duration in seconds",
        ),
        &["endpoint"],
    )
    .expect("metric can be created");

    let _ = registry.register(Box::new(requests_total.clone()));
    let _ = registry.register(Box::new(upstream_duration.clone()));

    // Initialize globals
    let _ = REGISTRY.set(registry);
    let _ = RELAY_REQUESTS_TOTAL.set(requests_total);
    let _ = UPSTREAM_REQUEST_DURATION_SECONDS.set(upstream_duration);
}

pub fn record_outcome(outcome: &str) {
    if let Some(counter) = RELAY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn observe_upstream(endpoint: &str, seconds: f64) {
    if let Some(histogram) = UPSTREAM_REQUEST_DURATION_SECONDS.get() {
        histogram.with_label_values(&[endpoint]).observe(seconds);
    }
}

pub fn get_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
