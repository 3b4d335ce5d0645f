//! Network access for the proxy.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ProxyError, Result};
use crate::proxy::{ProxyRequest, ProxyResponse};

/// Headers that describe one connection and must not be forwarded.
const HOP_BY_HOP: [&str; 10] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
    "host",
];

/// Returns true if the header may be copied between connections.
pub fn is_forwardable(name: &str) -> bool {
    !HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

// == Network Trait ==
/// Performs a real fetch. An `Err` means no response arrived at all;
/// HTTP error statuses are successful fetches.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse>;
}

// == HTTP Network ==
/// reqwest-backed network.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
}

impl HttpNetwork {
    /// Builds a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone());

        for (name, value) in request.headers() {
            if is_forwardable(name) {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }
        if !request.body().is_empty() {
            builder = builder.body(request.body().clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProxyError::Network(format!("{} {}: {}", request.method(), request.url(), e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter(|(name, _)| is_forwardable(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Network(format!("reading body of {}: {}", request.url(), e)))?;

        debug!("{} {} -> {}", request.method(), request.url(), status);
        Ok(ProxyResponse::new(status, headers, body))
    }
}
