//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Sync passes (runs, duration)
//! - Listing fetches per system
//! - Catalog inserts per system

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Sync Metrics
// =============================================================================

/// Sync passes by result.
pub static SYNC_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("retrodrop_sync_runs_total", "Total catalog sync passes"),
        &["result"], // "success", "failed", "rejected"
    )
    .unwrap()
});

/// Sync pass duration in seconds.
pub static SYNC_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "retrodrop_sync_duration_seconds",
            "Duration of a full catalog sync pass",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

// =============================================================================
// Listing Metrics
// =============================================================================

/// Listing page fetches by system and result.
pub static LISTING_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "retrodrop_listing_fetches_total",
            "Directory listing fetches",
        ),
        &["system", "result"], // result: "success", "error"
    )
    .unwrap()
});

/// Entries inserted into the catalog by system.
pub static ENTRIES_INSERTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "retrodrop_entries_inserted_total",
            "Catalog entries inserted by sync",
        ),
        &["system"],
    )
    .unwrap()
});

/// All core metrics, for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SYNC_RUNS.clone()),
        Box::new(SYNC_DURATION.clone()),
        Box::new(LISTING_FETCHES.clone()),
        Box::new(ENTRIES_INSERTED.clone()),
    ]
}
