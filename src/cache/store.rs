//! Cache Storage Module
//!
//! The storage area holding every cache namespace, keyed by identifier.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{Namespace, RequestKey};
use crate::error::Result;
use crate::proxy::ProxyResponse;

// == Cache Storage Trait ==
/// Asynchronous storage of named cache namespaces.
///
/// Every operation may suspend. Implementations serialize their own
/// operations; callers hold no locks across calls.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the namespace, creating it if absent.
    async fn open(&self, name: &str) -> Result<()>;

    /// Looks up a request in one namespace. A missing namespace is a miss.
    async fn match_request(&self, name: &str, key: &RequestKey) -> Result<Option<ProxyResponse>>;

    /// Stores a response, opening the namespace first if needed.
    async fn put(&self, name: &str, key: RequestKey, response: ProxyResponse) -> Result<()>;

    /// Deletes a whole namespace. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Lists every namespace identifier.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Lists the request keys stored in one namespace.
    async fn entries(&self, name: &str) -> Result<Vec<RequestKey>>;
}

// == Memory Cache Storage ==
/// In-process cache storage.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    namespaces: RwLock<BTreeMap<String, Namespace>>,
}

impl MemoryCacheStorage {
    // == Constructor ==
    /// Creates an empty storage area.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(name.to_string())
            .or_insert_with(Namespace::new);
        Ok(())
    }

    async fn match_request(&self, name: &str, key: &RequestKey) -> Result<Option<ProxyResponse>> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(name).and_then(|ns| ns.match_request(key)))
    }

    async fn put(&self, name: &str, key: RequestKey, response: ProxyResponse) -> Result<()> {
        let mut namespaces = self.namespaces.write().await;
        namespaces
            .entry(name.to_string())
            .or_insert_with(Namespace::new)
            .put(key, response);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut namespaces = self.namespaces.write().await;
        Ok(namespaces.remove(name).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.keys().cloned().collect())
    }

    async fn entries(&self, name: &str) -> Result<Vec<RequestKey>> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(name).map(Namespace::keys).unwrap_or_default())
    }
}
