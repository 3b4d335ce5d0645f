//! Fetch Statistics Module
//!
//! Tracks how intercepted requests were answered.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Fetch Stats ==
/// Lock-free counters shared between the proxy and its detached tasks.
#[derive(Debug, Default)]
pub struct FetchStats {
    hits: AtomicU64,
    misses: AtomicU64,
    network_errors: AtomicU64,
    fallbacks: AtomicU64,
    recached: AtomicU64,
    passthroughs: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FetchStatsSnapshot {
    /// Requests answered from the current namespace
    pub hits: u64,
    /// GET requests that had to go to the network
    pub misses: u64,
    /// Network fetches that produced no response
    pub network_errors: u64,
    /// Offline navigations answered with the shell entry point
    pub fallbacks: u64,
    /// Network responses written back to the cache
    pub recached: u64,
    /// Non-GET requests left to the host
    pub passthroughs: u64,
}

impl FetchStats {
    // == Constructor ==
    /// Creates counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_error(&self) {
        self.network_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recache(&self) {
        self.recached.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_passthrough(&self) {
        self.passthroughs.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads every counter.
    pub fn snapshot(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            recached: self.recached.load(Ordering::Relaxed),
            passthroughs: self.passthroughs.load(Ordering::Relaxed),
        }
    }
}

impl FetchStatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no GET was intercepted.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
