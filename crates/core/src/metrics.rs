//! Prometheus metrics for core components.
//!
//! - Librarian (offline answers, model answers, fallbacks)
//! - Backend REST calls (per operation and result)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Librarian queries by outcome.
pub static LIBRARIAN_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bookbridge_librarian_requests_total",
            "Total librarian queries",
        ),
        &["outcome"], // "offline", "answered", "fallback"
    )
    .unwrap()
});

/// Model tokens used by the librarian.
pub static LLM_TOKENS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bookbridge_llm_tokens_total", "Total model tokens used"),
        &["provider", "direction"], // direction: "input", "output"
    )
    .unwrap()
});

/// Backend REST requests.
pub static BACKEND_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bookbridge_backend_requests_total",
            "Total requests to the marketplace backend",
        ),
        &["operation", "result"], // result: "success", "error", "skipped"
    )
    .unwrap()
});

/// Backend REST request duration.
pub static BACKEND_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bookbridge_backend_request_duration_seconds",
            "Duration of marketplace backend requests",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(LIBRARIAN_REQUESTS.clone()),
        Box::new(LLM_TOKENS.clone()),
        Box::new(BACKEND_REQUESTS.clone()),
        Box::new(BACKEND_REQUEST_DURATION.clone()),
    ]
}
