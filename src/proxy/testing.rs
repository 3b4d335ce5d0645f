//! Test doubles for the proxy's storage and network seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::cache::{CacheStorage, MemoryCacheStorage, RequestKey};
use crate::error::{ProxyError, Result};
use crate::proxy::{Network, ProxyRequest, ProxyResponse};

/// Lets detached tasks spawned on the current-thread test runtime finish.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

// == Stub Network ==
/// Serves canned responses by URL; unknown URLs answer 404.
#[derive(Default)]
pub struct StubNetwork {
    routes: Mutex<HashMap<String, (u16, Vec<(String, String)>, Bytes)>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl StubNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, status: u16, body: &'static str) {
        self.serve_with_headers(url, status, &[], body);
    }

    pub fn serve_with_headers(
        &self,
        url: &str,
        status: u16,
        headers: &[(&str, &str)],
        body: &'static str,
    ) {
        let headers = headers
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.routes.lock().unwrap().insert(
            url.to_string(),
            (status, headers, Bytes::from_static(body.as_bytes())),
        );
    }

    /// While offline every fetch fails without a response.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of fetches attempted, offline ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &ProxyRequest) -> Result<ProxyResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(ProxyError::Network(format!("offline: {}", request.url())));
        }

        let (status, headers, body) = self
            .routes
            .lock()
            .unwrap()
            .get(request.url().as_str())
            .cloned()
            .unwrap_or((404, Vec::new(), Bytes::new()));
        Ok(ProxyResponse::new(status, headers, body))
    }
}

// == Failing Storage ==
/// Memory storage that rejects selected operations.
#[derive(Default)]
pub struct FailingStorage {
    inner: MemoryCacheStorage,
    fail_puts: bool,
    fail_deletes: bool,
    fail_keys: bool,
}

impl FailingStorage {
    /// Storage holding `names` whose namespace deletions always fail.
    pub async fn rejecting_deletes(names: &[&str]) -> Self {
        let inner = MemoryCacheStorage::new();
        for name in names {
            inner.open(name).await.unwrap();
        }
        Self {
            inner,
            fail_deletes: true,
            ..Self::default()
        }
    }

    /// Storage whose writes always fail.
    pub fn rejecting_puts() -> Self {
        Self {
            fail_puts: true,
            ..Self::default()
        }
    }

    /// Storage that cannot enumerate its namespaces.
    pub fn rejecting_keys() -> Self {
        Self {
            fail_keys: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl CacheStorage for FailingStorage {
    async fn open(&self, name: &str) -> Result<()> {
        self.inner.open(name).await
    }

    async fn match_request(&self, name: &str, key: &RequestKey) -> Result<Option<ProxyResponse>> {
        self.inner.match_request(name, key).await
    }

    async fn put(&self, name: &str, key: RequestKey, response: ProxyResponse) -> Result<()> {
        if self.fail_puts {
            return Err(ProxyError::Storage("quota exceeded".to_string()));
        }
        self.inner.put(name, key, response).await
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        if self.fail_deletes {
            return Err(ProxyError::Storage(format!("{} is locked", name)));
        }
        self.inner.delete(name).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        if self.fail_keys {
            return Err(ProxyError::Storage("storage unavailable".to_string()));
        }
        self.inner.keys().await
    }

    async fn entries(&self, name: &str) -> Result<Vec<RequestKey>> {
        self.inner.entries(name).await
    }
}
