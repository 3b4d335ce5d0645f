//! Intercepted request descriptor.

use axum::http::Method;
use bytes::Bytes;
use url::Url;

use crate::cache::RequestKey;

// == Request Mode ==
/// Why the client issued the request, as reported by `Sec-Fetch-Mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level document load
    Navigate,
    /// Same-origin subresource
    SameOrigin,
    /// Opaque cross-origin subresource
    #[default]
    NoCors,
    /// CORS-mode subresource
    Cors,
}

impl RequestMode {
    /// Parses a `Sec-Fetch-Mode` header value.
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "navigate" => Some(Self::Navigate),
            "same-origin" => Some(Self::SameOrigin),
            "no-cors" => Some(Self::NoCors),
            "cors" => Some(Self::Cors),
            _ => None,
        }
    }
}

// == Proxy Request ==
/// An outbound request as seen by the fetch hook.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    method: Method,
    url: Url,
    mode: RequestMode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ProxyRequest {
    // == Constructors ==
    /// Creates a request with no headers and an empty body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            mode: RequestMode::default(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    // == Accessors ==
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    // == Policy Helpers ==
    /// Returns the cache identity of this request.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }

    /// True for top-level document loads.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// True when scheme, host and port match the given origin.
    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }

    /// True when the request carries `Authorization` or `Cookie`.
    pub fn has_credentials(&self) -> bool {
        self.headers.iter().any(|(name, _)| {
            name.eq_ignore_ascii_case("authorization") || name.eq_ignore_ascii_case("cookie")
        })
    }
}
