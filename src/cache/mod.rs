//! Cache Module
//!
//! Versioned cache namespaces holding request-keyed response snapshots.

mod entry;
mod namespace;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, RequestKey};
pub use namespace::Namespace;
pub use stats::{FetchStats, FetchStatsSnapshot};
pub use store::{CacheStorage, MemoryCacheStorage};
