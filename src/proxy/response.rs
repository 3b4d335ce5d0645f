//! Response payloads flowing through the proxy.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

// == Proxy Response ==
/// A response whose body can be handed to exactly one consumer.
///
/// There is no `Clone`: serving a response and storing it requires an
/// explicit [`ProxyResponse::duplicate`].
#[derive(Debug)]
pub struct ProxyResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ProxyResponse {
    // == Constructor ==
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first value of a header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the response may be kept in a cache shared by every client.
    ///
    /// `Set-Cookie` or a `private` / `no-store` cache directive ties it to
    /// one user.
    pub fn is_shareable(&self) -> bool {
        if self.header("set-cookie").is_some() {
            return false;
        }

        !self
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("cache-control"))
            .flat_map(|(_, value)| value.split(','))
            .any(|directive| {
                let name = directive.split('=').next().unwrap_or_default().trim();
                name.eq_ignore_ascii_case("private") || name.eq_ignore_ascii_case("no-store")
            })
    }

    // == Duplicate ==
    /// Splits the response into two independent copies with the same
    /// status, headers and body.
    pub fn duplicate(self) -> (Self, Self) {
        let copy = Self {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
        };
        (self, copy)
    }

    /// Consumes the response into its parts.
    pub fn into_parts(self) -> (u16, Vec<(String, String)>, Bytes) {
        (self.status, self.headers, self.body)
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            // Upstream headers that fail to re-parse are dropped rather than failing the response
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.append(name, value);
            }
        }

        response
    }
}
