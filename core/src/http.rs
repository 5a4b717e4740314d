//! HTTP request and response types exchanged with a `Transport`.
//!
//! # Design
//! Requests are described as plain data so every operation can be built and
//! inspected without touching the network. A `Transport` executes the request
//! and hands back an `HttpResponse`; the client then turns that into an
//! `ApiResponse` carrying the parsed JSON body.

use serde_json::Value;

use crate::error::ApiError;

/// Header carrying the credential on every request.
pub const API_KEY_HEADER: &str = "Api-Key";

/// HTTP method for a request. The remote API only uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is the absolute endpoint URL without a query string; `query` holds
/// the already-flattened pairs in the order they should be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the JSON body back into a value.
    ///
    /// Lossy: `None` both for body-less requests and for a body that is not
    /// valid JSON. Bodies built by the client are always serialized by
    /// `serde_json`, so the second case only arises for hand-built requests.
    pub fn json_body(&self) -> Option<Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A successful round-trip: status code plus the parsed JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Convert a raw response, mapping any non-2xx status to `ApiError::Http`.
    ///
    /// An empty 2xx body is treated as JSON `null`.
    pub fn from_http(response: HttpResponse) -> Result<Self, ApiError> {
        if !(200..300).contains(&response.status) {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        let body = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body)
                .map_err(|e| ApiError::Deserialization(e.to_string()))?
        };
        Ok(Self {
            status: response.status,
            body,
        })
    }

    /// Look up a top-level field of the body, treating JSON `null` as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name).filter(|v| !v.is_null())
    }
}
