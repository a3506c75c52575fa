//! Prometheus Metrics Module
//!
//! Provides cache-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Cache mutations by entity and operation
//! - Messages evicted from channel histories
//! - Active shard stores
//! - Dispatched gateway events by name and outcome

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Cache mutation counter - tracks applied mutations by entity and operation
pub static CACHE_MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cache_mutations_total", "Total number of applied cache mutations")
            .namespace("gateway_state"),
        &["entity", "op"], // op: "add", "update", "remove"
    )
    .expect("Failed to create CACHE_MUTATIONS_TOTAL metric")
});

/// Messages dropped from the front of a channel history
pub static MESSAGES_EVICTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "messages_evicted_total",
            "Messages evicted from channel histories",
        )
        .namespace("gateway_state"),
    )
    .expect("Failed to create MESSAGES_EVICTED_TOTAL metric")
});

/// Shard stores currently registered
pub static SHARDS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("shards_active", "Number of registered shard stores").namespace("gateway_state"),
    )
    .expect("Failed to create SHARDS_ACTIVE metric")
});

/// Gateway events handed to the dispatcher
pub static EVENTS_DISPATCHED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_dispatched_total", "Gateway events applied to the cache")
            .namespace("gateway_state"),
        &["event", "outcome"], // outcome: "applied", "skipped", "error"
    )
    .expect("Failed to create EVENTS_DISPATCHED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CACHE_MUTATIONS_TOTAL.clone()))
        .expect("Failed to register CACHE_MUTATIONS_TOTAL");
    registry
        .register(Box::new(MESSAGES_EVICTED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_EVICTED_TOTAL");
    registry
        .register(Box::new(SHARDS_ACTIVE.clone()))
        .expect("Failed to register SHARDS_ACTIVE");
    registry
        .register(Box::new(EVENTS_DISPATCHED_TOTAL.clone()))
        .expect("Failed to register EVENTS_DISPATCHED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record a cache mutation
pub fn record_mutation(entity: &str, op: &str) {
    CACHE_MUTATIONS_TOTAL.with_label_values(&[entity, op]).inc();
}

/// Helper to record evicted messages
pub fn record_evictions(count: usize) {
    if count > 0 {
        MESSAGES_EVICTED_TOTAL.inc_by(count as u64);
    }
}

/// Helper to update the registered shard count
pub fn set_active_shards(count: usize) {
    SHARDS_ACTIVE.set(count as i64);
}

/// Helper to record a dispatched event
pub fn record_event(event: &str, outcome: &str) {
    EVENTS_DISPATCHED_TOTAL
        .with_label_values(&[event, outcome])
        .inc();
}
