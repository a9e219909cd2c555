//! Process-wide Prometheus metrics.
//!
//! Counters are registered once in a private registry and rendered by the
//! admin HTTP server (see [`crate::admin_http`]).

use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

fn counter_vec(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let c = IntCounterVec::new(Opts::new(name, help), labels).expect("valid metric definition");
    REGISTRY.register(Box::new(c.clone())).expect("metric registered once");
    c
}

/// Lead submissions by outcome: `delivered`, `rejected`, `failed`.
pub static LEADS_TOTAL: Lazy<IntCounterVec> =
    Lazy::new(|| counter_vec("leads_total", "Lead submissions by outcome", &["outcome"]));

/// Image uploads by outcome: `accepted`, `rejected`, `failed`.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> =
    Lazy::new(|| counter_vec("uploads_total", "Image uploads by outcome", &["outcome"]));

/// Record mutations per collection and operation.
pub static RECORD_WRITES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    counter_vec("record_writes_total", "Record writes by collection and op", &["collection", "op"])
});

/// Query cache lookups: `hit` or `miss`.
pub static QUERY_CACHE_TOTAL: Lazy<IntCounterVec> =
    Lazy::new(|| counter_vec("query_cache_total", "Query cache lookups", &["result"]));

pub fn lead(outcome: &str) {
    LEADS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn upload(outcome: &str) {
    UPLOADS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_write(collection: &str, op: &str) {
    RECORD_WRITES_TOTAL.with_label_values(&[collection, op]).inc();
}

pub fn cache_lookup(hit: bool) {
    QUERY_CACHE_TOTAL.with_label_values(&[if hit { "hit" } else { "miss" }]).inc();
}

/// Render all registered metrics in the Prometheus text format.
pub fn render() -> (StatusCode, String) {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }
    match String::from_utf8(buf) {
        Ok(s) => (StatusCode::OK, s),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
