//! Cache Entry Module
//!
//! Defines request identities and the response snapshots stored under them.

use std::fmt;

use axum::http::Method;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

use crate::proxy::ProxyResponse;

// == Request Key ==
/// Identity of a cached request: method plus normalized URL.
///
/// Fragments never reach the network, so they are dropped from the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey {
    method: String,
    url: String,
}

impl RequestKey {
    // == Constructor ==
    /// Creates a key for the given method and URL.
    pub fn new(method: &Method, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);

        Self {
            method: method.as_str().to_string(),
            url: url.into(),
        }
    }

    /// Creates a key for a GET of the given URL.
    pub fn get(url: &Url) -> Self {
        Self::new(&Method::GET, url)
    }

    /// Returns the request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the normalized request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

// == Cache Entry ==
/// Stored snapshot of a response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// HTTP status code
    pub status: u16,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
    /// When the snapshot was taken
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Takes ownership of a response and freezes it into a snapshot.
    pub fn from_response(response: ProxyResponse) -> Self {
        let (status, headers, body) = response.into_parts();

        Self {
            status,
            headers,
            body,
            cached_at: Utc::now(),
        }
    }

    // == To Response ==
    /// Produces a fresh readable response from the snapshot.
    pub fn to_response(&self) -> ProxyResponse {
        ProxyResponse::new(self.status, self.headers.clone(), self.body.clone())
    }
}
