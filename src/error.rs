//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::proxy::WorkerState;

// == Proxy Error Enum ==
/// Unified error type for the caching proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Configuration value cannot be used
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Shell manifest is empty or contains an unresolvable entry
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Lifecycle hook invoked in the wrong worker state
    #[error("Invalid worker state: expected {expected:?}, found {found:?}")]
    InvalidState {
        expected: WorkerState,
        found: WorkerState,
    },

    /// Network fetch failed without producing a response
    #[error("Network error: {0}")]
    Network(String),

    /// Network produced a response that cannot be cached as part of the shell
    #[error("Bad status {status} for {url}")]
    BadStatus { url: String, status: u16 },

    /// Cache storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Network(_) | ProxyError::BadStatus { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::InvalidState { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ProxyError::Config(_)
            | ProxyError::InvalidManifest(_)
            | ProxyError::Storage(_)
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
