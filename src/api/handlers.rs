//! API Handlers
//!
//! The host side of the worker: turns HTTP traffic into fetch and message
//! events and turns fetch outcomes back into HTTP responses.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::cache::{CacheStorage, MemoryCacheStorage};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::{ErrorResponse, HealthResponse, StatusResponse};
use crate::proxy::{
    is_forwardable, CacheProxy, FetchOutcome, HttpNetwork, Network, ProxyRequest, RequestMode,
    WorkerHooks,
};

/// Largest request body forwarded to the upstream.
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The worker instance
    pub proxy: Arc<CacheProxy>,
}

impl AppState {
    /// Creates a new AppState around a worker instance.
    pub fn new(proxy: CacheProxy) -> Self {
        Self {
            proxy: Arc::new(proxy),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Uses in-memory cache storage and the reqwest-backed network.
    pub fn from_config(config: &Config) -> Result<Self> {
        let network = HttpNetwork::new(Duration::from_secs(config.upstream_timeout))?;
        let proxy = CacheProxy::from_config(
            config,
            Arc::new(MemoryCacheStorage::new()),
            Arc::new(network),
        )?;
        Ok(Self::new(proxy))
    }
}

/// Fallback handler: every request not aimed at the control routes.
///
/// Passthrough requests go to the network uncached. A fetch that produced
/// nothing surfaces as 502.
pub async fn intercept_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response> {
    let request = to_proxy_request(state.proxy.origin(), request).await?;
    let target = request.url().to_string();

    match state.proxy.on_fetch(request).await {
        FetchOutcome::Respond(response) => Ok(response.into_response()),
        FetchOutcome::Passthrough(request) => {
            let response = state.proxy.network().fetch(&request).await?;
            Ok(response.into_response())
        }
        FetchOutcome::NoResponse => Ok((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::new(format!("Failed to load {}", target))),
        )
            .into_response()),
    }
}

/// Handler for POST /__shell_cache/message
///
/// Delivers a client message. The reply never reflects the outcome.
pub async fn message_handler(State(state): State<AppState>, body: Bytes) -> Result<StatusCode> {
    let message: Value = serde_json::from_slice(&body)
        .map_err(|e| ProxyError::InvalidRequest(format!("message is not JSON: {}", e)))?;

    if let Err(e) = state.proxy.on_message(&message).await {
        warn!("Client message handling failed: {}", e);
    }

    Ok(StatusCode::ACCEPTED)
}

/// Handler for GET /__shell_cache/status
pub async fn status_handler(State(state): State<AppState>) -> Result<Json<StatusResponse>> {
    let proxy = &state.proxy;
    let namespaces = proxy.storage().keys().await?;
    let entries = proxy.entry_count().await?;
    let stats = proxy.stats();

    Ok(Json(StatusResponse {
        state: proxy.state().await,
        cache_version: proxy.version().to_string(),
        namespaces,
        entries,
        clients_claimed: proxy.clients_claimed().await,
        hit_rate: stats.hit_rate(),
        stats,
    }))
}

/// Handler for GET /__shell_cache/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Request Conversion ==

/// Builds the request descriptor the fetch hook sees.
async fn to_proxy_request(origin: &Url, request: Request) -> Result<ProxyRequest> {
    let (parts, body) = request.into_parts();

    let url = resolve_target(origin, &parts.uri)?;
    let mode = request_mode(&parts.method, &parts.headers);
    let headers = parts
        .headers
        .iter()
        .filter(|(name, _)| is_forwardable(name.as_str()))
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|e| ProxyError::InvalidRequest(format!("unreadable body: {}", e)))?;

    Ok(ProxyRequest::new(parts.method, url)
        .with_mode(mode)
        .with_headers(headers)
        .with_body(body))
}

/// Origin-form paths are resolved against the upstream origin. Absolute-form
/// targets are accepted only when they name that same origin.
fn resolve_target(origin: &Url, uri: &Uri) -> Result<Url> {
    let bad_target =
        |e: url::ParseError| ProxyError::InvalidRequest(format!("bad request target {}: {}", uri, e));

    if uri.scheme().is_none() || uri.authority().is_none() {
        let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
        return origin.join(path).map_err(bad_target);
    }

    let url = Url::parse(&uri.to_string()).map_err(bad_target)?;
    if url.origin() != origin.origin() {
        return Err(ProxyError::InvalidRequest(format!(
            "{} is not served by this proxy",
            url.origin().ascii_serialization()
        )));
    }
    Ok(url)
}

/// `Sec-Fetch-Mode` when present, otherwise a GET accepting HTML is
/// treated as a navigation.
fn request_mode(method: &Method, headers: &HeaderMap) -> RequestMode {
    if let Some(mode) = headers
        .get("sec-fetch-mode")
        .and_then(|v| v.to_str().ok())
        .and_then(RequestMode::from_header)
    {
        return mode;
    }

    let accepts_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("text/html"));

    if *method == Method::GET && accepts_html {
        RequestMode::Navigate
    } else {
        RequestMode::default()
    }
}
