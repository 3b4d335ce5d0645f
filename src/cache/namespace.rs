//! Cache Namespace Module
//!
//! A named, versioned bucket of request/response pairs.

use std::collections::HashMap;

use crate::cache::{CacheEntry, RequestKey};
use crate::proxy::ProxyResponse;

// == Namespace ==
/// One generation of cached entries. The storage names it by version.
#[derive(Debug, Default)]
pub struct Namespace {
    /// Stored snapshots by request identity
    entries: HashMap<RequestKey, CacheEntry>,
}

impl Namespace {
    // == Constructor ==
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    // == Match ==
    /// Looks up a request, returning a fresh copy of the stored response.
    pub fn match_request(&self, key: &RequestKey) -> Option<ProxyResponse> {
        self.entries.get(key).map(CacheEntry::to_response)
    }

    // == Put ==
    /// Stores a response under the key, replacing any previous entry.
    ///
    /// Returns true when an existing entry was overwritten.
    pub fn put(&mut self, key: RequestKey, response: ProxyResponse) -> bool {
        self.entries
            .insert(key, CacheEntry::from_response(response))
            .is_some()
    }

    // == Keys ==
    /// Returns every stored request key, sorted.
    pub fn keys(&self) -> Vec<RequestKey> {
        let mut keys: Vec<RequestKey> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}
