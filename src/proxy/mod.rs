//! Proxy Module
//!
//! The cache-first fetch policy and the worker lifecycle it runs under.

mod hooks;
mod lifecycle;
mod network;
mod request;
mod response;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use hooks::{FetchOutcome, WorkerHooks};
pub use lifecycle::{Lifecycle, WorkerState};
pub use network::{is_forwardable, HttpNetwork, Network};
pub use request::{ProxyRequest, RequestMode};
pub use response::ProxyResponse;
pub use worker::CacheProxy;
