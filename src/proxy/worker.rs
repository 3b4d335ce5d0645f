//! Cache Proxy
//!
//! The cache-first policy: keeps one versioned namespace populated with the
//! application shell and answers intercepted requests from it, falling back
//! to the network and re-caching what comes back.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use futures::future::join_all;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{CacheStorage, FetchStats, FetchStatsSnapshot, RequestKey};
use crate::config::Config;
use crate::error::{ProxyError, Result};
use crate::models::ControlCommand;
use crate::proxy::{
    FetchOutcome, Lifecycle, Network, ProxyRequest, ProxyResponse, WorkerHooks, WorkerState,
};
use crate::tasks::spawn_cache_put;

// == Cache Proxy ==
/// A worker instance bound to one cache version.
pub struct CacheProxy {
    /// Identifier of the current namespace
    version: String,
    /// Origin the worker serves; only its responses are re-cached
    origin: Url,
    /// Shell resources, relative to `origin`
    manifest: Vec<String>,
    /// Shell entry point for offline navigations
    fallback: Url,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn Network>,
    lifecycle: RwLock<Lifecycle>,
    stats: Arc<FetchStats>,
}

impl CacheProxy {
    // == Constructor ==
    /// Creates a worker instance from configuration.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn Network>,
    ) -> Result<Self> {
        let origin = Url::parse(&config.upstream_origin).map_err(|e| {
            ProxyError::Config(format!(
                "upstream origin '{}' is not a URL: {}",
                config.upstream_origin, e
            ))
        })?;
        let fallback = origin.join(&config.shell_fallback).map_err(|e| {
            ProxyError::Config(format!(
                "shell fallback '{}' does not resolve: {}",
                config.shell_fallback, e
            ))
        })?;

        Ok(Self {
            version: config.cache_version.clone(),
            origin,
            manifest: config.shell_manifest.clone(),
            fallback,
            storage,
            network,
            lifecycle: RwLock::new(Lifecycle::new()),
            stats: Arc::new(FetchStats::new()),
        })
    }

    // == Accessors ==
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub fn network(&self) -> &Arc<dyn Network> {
        &self.network
    }

    pub fn stats(&self) -> FetchStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn state(&self) -> WorkerState {
        self.lifecycle.read().await.state()
    }

    pub async fn clients_claimed(&self) -> bool {
        self.lifecycle.read().await.clients_claimed()
    }

    pub async fn skip_waiting_requested(&self) -> bool {
        self.lifecycle.read().await.skip_waiting_requested()
    }

    // == Initialize ==
    /// Opens the current namespace and stores every manifest entry.
    ///
    /// Entries are fetched concurrently. Any fetch error or non-2xx status
    /// fails the whole call; entries already stored stay in place.
    pub async fn initialize(&self, manifest: &[String]) -> Result<()> {
        if manifest.is_empty() {
            return Err(ProxyError::InvalidManifest("manifest is empty".to_string()));
        }

        let mut seen = HashSet::new();
        let mut urls = Vec::with_capacity(manifest.len());
        for path in manifest {
            let url = self.origin.join(path).map_err(|e| {
                ProxyError::InvalidManifest(format!("'{}' does not resolve: {}", path, e))
            })?;
            if !seen.insert(RequestKey::get(&url)) {
                return Err(ProxyError::InvalidManifest(format!(
                    "duplicate entry '{}'",
                    path
                )));
            }
            urls.push(url);
        }

        self.storage.open(&self.version).await?;

        let results = join_all(urls.into_iter().map(|url| self.cache_shell_resource(url))).await;
        for result in results {
            result?;
        }

        info!(
            "Cached {} shell resources in {}",
            manifest.len(),
            self.version
        );
        Ok(())
    }

    async fn cache_shell_resource(&self, url: Url) -> Result<()> {
        let request = ProxyRequest::get(url);
        let response = self.network.fetch(&request).await?;

        if !response.is_ok() {
            return Err(ProxyError::BadStatus {
                url: request.url().to_string(),
                status: response.status(),
            });
        }

        self.storage
            .put(&self.version, request.key(), response)
            .await?;
        debug!("Cached shell resource {}", request.url());
        Ok(())
    }

    // == Activate And Prune ==
    /// Deletes every namespace except the current one.
    ///
    /// Returns the number of namespaces removed.
    pub async fn activate_and_prune(&self) -> Result<usize> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .await?
            .into_iter()
            .filter(|name| name != &self.version)
            .collect();

        self.delete_namespaces(stale).await
    }

    // == Clear All ==
    /// Deletes every namespace, the current one included.
    pub async fn clear_all(&self) -> Result<usize> {
        let names = self.storage.keys().await?;
        self.delete_namespaces(names).await
    }

    /// Attempts every deletion, then fails if any of them failed.
    async fn delete_namespaces(&self, names: Vec<String>) -> Result<usize> {
        let results = join_all(names.iter().map(|name| self.storage.delete(name))).await;

        let mut deleted = 0;
        let mut failed = Vec::new();
        for (name, result) in names.iter().zip(results) {
            match result {
                Ok(true) => {
                    deleted += 1;
                    info!("Deleted cache namespace {}", name);
                }
                Ok(false) => debug!("Cache namespace {} already gone", name),
                Err(e) => {
                    warn!("Failed to delete cache namespace {}: {}", name, e);
                    failed.push(name.as_str());
                }
            }
        }

        if failed.is_empty() {
            Ok(deleted)
        } else {
            Err(ProxyError::Storage(format!(
                "failed to delete namespaces: {}",
                failed.join(", ")
            )))
        }
    }

    // == Handle Fetch ==
    /// Cache-first answer for one intercepted request.
    pub async fn handle_fetch(&self, request: ProxyRequest) -> FetchOutcome {
        if *request.method() != Method::GET {
            self.stats.record_passthrough();
            debug!("Passing through {} {}", request.method(), request.url());
            return FetchOutcome::Passthrough(request);
        }

        let key = request.key();
        match self.storage.match_request(&self.version, &key).await {
            Ok(Some(cached)) => {
                self.stats.record_hit();
                debug!("Cache hit {}", key);
                return FetchOutcome::Respond(cached);
            }
            Ok(None) => self.stats.record_miss(),
            Err(e) => {
                self.stats.record_miss();
                warn!("Cache lookup for {} failed, using network: {}", key, e);
            }
        }

        match self.network.fetch(&request).await {
            Ok(response) => {
                if self.should_recache(&request, &response) {
                    let (served, stored) = response.duplicate();
                    spawn_cache_put(
                        self.storage.clone(),
                        self.version.clone(),
                        key,
                        stored,
                        self.stats.clone(),
                    );
                    FetchOutcome::Respond(served)
                } else {
                    FetchOutcome::Respond(response)
                }
            }
            Err(e) => {
                self.stats.record_network_error();
                debug!("Network failed for {}: {}", key, e);

                if request.is_navigation() {
                    if let Some(shell) = self.cached_shell().await {
                        self.stats.record_fallback();
                        info!("Offline navigation to {}, serving shell", request.url());
                        return FetchOutcome::Respond(shell);
                    }
                }
                FetchOutcome::NoResponse
            }
        }
    }

    /// Same-origin 200s are re-cached unless they belong to one user.
    fn should_recache(&self, request: &ProxyRequest, response: &ProxyResponse) -> bool {
        if response.status() != 200 || !request.is_same_origin(&self.origin) {
            return false;
        }
        if request.has_credentials() || !response.is_shareable() {
            debug!("Not caching per-user response for {}", request.url());
            return false;
        }
        true
    }

    async fn cached_shell(&self) -> Option<ProxyResponse> {
        let key = RequestKey::get(&self.fallback);
        match self.storage.match_request(&self.version, &key).await {
            Ok(shell) => shell,
            Err(e) => {
                warn!("Shell lookup failed: {}", e);
                None
            }
        }
    }

    /// Number of entries in the current namespace.
    pub async fn entry_count(&self) -> Result<usize> {
        Ok(self.storage.entries(&self.version).await?.len())
    }
}

// == Worker Hooks ==
#[async_trait]
impl WorkerHooks for CacheProxy {
    async fn on_install(&self) -> Result<()> {
        {
            let mut lifecycle = self.lifecycle.write().await;
            lifecycle.expect(WorkerState::Installing)?;
            lifecycle.skip_waiting();
        }

        match self.initialize(&self.manifest).await {
            Ok(()) => self.lifecycle.write().await.installed(),
            Err(e) => {
                warn!("Install failed: {}", e);
                self.lifecycle.write().await.install_failed()?;
                Err(e)
            }
        }
    }

    async fn on_activate(&self) -> Result<()> {
        self.lifecycle
            .read()
            .await
            .expect(WorkerState::Activating)?;

        let pruned = self.activate_and_prune().await?;
        info!("Pruned {} stale cache namespaces", pruned);

        self.lifecycle.write().await.claim_clients()
    }

    async fn on_fetch(&self, request: ProxyRequest) -> FetchOutcome {
        self.handle_fetch(request).await
    }

    async fn on_message(&self, message: &Value) -> Result<()> {
        match ControlCommand::from_message(message) {
            Some(ControlCommand::ClearAllCaches) => {
                let cleared = self.clear_all().await?;
                info!("Cleared {} cache namespaces on client request", cleared);
                Ok(())
            }
            None => {
                debug!("Ignoring client message");
                Ok(())
            }
        }
    }
}
