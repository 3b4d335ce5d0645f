//! Shell Cache - An offline-first caching proxy
//!
//! Keeps an application shell in a versioned cache namespace and answers
//! requests cache-first, falling back to the network and re-caching
//! successful same-origin responses.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use proxy::{CacheProxy, WorkerHooks};
