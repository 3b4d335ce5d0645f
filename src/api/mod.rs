//! API Module
//!
//! The HTTP host that drives the worker.
//!
//! # Endpoints
//! - `POST /__shell_cache/message` - Deliver a client control message
//! - `GET /__shell_cache/status` - Worker status
//! - `GET /__shell_cache/health` - Health check endpoint
//! - any other request - Intercepted by the fetch hook

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, CONTROL_PREFIX};
