//! Response DTOs for the proxy's own endpoints
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::FetchStatsSnapshot;
use crate::proxy::WorkerState;

/// Response body for the status endpoint (GET /__shell_cache/status)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Lifecycle state of the worker
    pub state: WorkerState,
    /// Identifier of the current namespace
    pub cache_version: String,
    /// Every namespace present in storage
    pub namespaces: Vec<String>,
    /// Entries stored in the current namespace
    pub entries: usize,
    /// Whether the worker controls clients
    pub clients_claimed: bool,
    /// Fetch counters
    pub stats: FetchStatsSnapshot,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

/// Response body for the health endpoint (GET /__shell_cache/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error body for intercepted requests that produced no response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_serialize() {
        let resp = StatusResponse {
            state: WorkerState::Active,
            cache_version: "scorekeeper-v1".to_string(),
            namespaces: vec!["scorekeeper-v1".to_string()],
            entries: 3,
            clients_claimed: true,
            stats: FetchStatsSnapshot::default(),
            hit_rate: 0.0,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["state"], "active");
        assert_eq!(json["entries"], 3);
        assert_eq!(json["stats"]["hits"], 0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Failed to load");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Failed to load"));
    }
}
