//! API Routes
//!
//! Configures the Axum router: control routes under `/__shell_cache`,
//! everything else intercepted by the worker.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, intercept_handler, message_handler, status_handler, AppState,
};

/// Prefix of the proxy's own endpoints.
pub const CONTROL_PREFIX: &str = "/__shell_cache";

/// Creates the main router.
///
/// # Endpoints
/// - `POST /__shell_cache/message` - Deliver a client control message
/// - `GET /__shell_cache/status` - Worker state, namespaces and fetch counters
/// - `GET /__shell_cache/health` - Health check endpoint
/// - anything else - Intercepted by the cache-first fetch policy
///
/// CORS applies to the control routes only, so proxied responses keep the
/// upstream's headers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let control = Router::new()
        .route("/message", post(message_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(cors);

    Router::new()
        .nest(CONTROL_PREFIX, control)
        .fallback(intercept_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
