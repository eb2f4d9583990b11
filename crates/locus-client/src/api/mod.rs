//! Request and response types

use std::collections::BTreeMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use locus_core::error::LocusError;
use locus_core::types::HttpMethod;
use crate::ClientResult;

/// One outgoing HTTP call.
///
/// Header names are stored lower-case. The retry counter belongs to this
/// descriptor only and is advanced by the client's retry stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL or path relative to the API base
    pub url: String,
    /// Request headers
    pub headers: BTreeMap<String, String>,
    /// JSON request body
    pub body: Option<serde_json::Value>,
    /// Retries performed so far
    pub retry_count: u32,
    /// Whether the response cache may serve or store this request
    pub use_cache: bool,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` and `url`
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            retry_count: 0,
            use_cache: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Add or replace a header
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Attach a JSON body
    pub fn with_json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| LocusError::InvalidRequest {
            message: format!("Request body is not valid JSON: {}", e),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Bypass the response cache for this call
    pub fn no_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    /// Set a header, replacing any existing value regardless of case
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Serialized body bytes, if any
    pub fn body_bytes(&self) -> ClientResult<Option<Vec<u8>>> {
        self.body
            .as_ref()
            .map(|body| {
                serde_json::to_vec(body).map_err(|e| LocusError::InvalidRequest {
                    message: format!("Failed to serialize request body: {}", e),
                })
            })
            .transpose()
    }
}

/// A received HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Final request URL
    pub url: String,
    /// Response headers (lower-case names)
    pub headers: BTreeMap<String, String>,
    /// Raw body
    pub body: Vec<u8>,
    /// True when served from the response cache
    pub cached: bool,
}

impl ApiResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| LocusError::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }

    /// Body as UTF-8 text, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_descriptor_defaults() {
        let descriptor = RequestDescriptor::get("/items");
        assert_eq!(descriptor.method, HttpMethod::Get);
        assert_eq!(descriptor.url, "/items");
        assert_eq!(descriptor.retry_count, 0);
        assert!(descriptor.use_cache);
        assert!(descriptor.headers.is_empty());
        assert!(descriptor.body.is_none());
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let mut descriptor = RequestDescriptor::get("/items").with_header("X-Trace", "abc");
        assert_eq!(descriptor.header("x-trace"), Some("abc"));

        descriptor.set_header("AUTHORIZATION", "Bearer one");
        descriptor.set_header("authorization", "Bearer two");
        assert_eq!(descriptor.header("Authorization"), Some("Bearer two"));
        assert_eq!(descriptor.headers.len(), 2);
    }

    #[test]
    fn test_json_body() {
        let descriptor = RequestDescriptor::post("/locations")
            .with_json(&serde_json::json!({"name": "Oslo"}))
            .unwrap();
        let bytes = descriptor.body_bytes().unwrap().unwrap();
        assert_eq!(bytes, br#"{"name":"Oslo"}"#.to_vec());

        assert_eq!(RequestDescriptor::get("/items").body_bytes().unwrap(), None);
    }

    #[test]
    fn test_response_json_and_text() {
        #[derive(Deserialize)]
        struct Item {
            id: u32,
        }

        let response = ApiResponse {
            status: 200,
            url: "http://localhost/items".to_string(),
            headers: BTreeMap::new(),
            body: br#"{"id":1}"#.to_vec(),
            cached: false,
        };
        assert!(response.is_success());
        assert_eq!(response.json::<Item>().unwrap().id, 1);
        assert_eq!(response.text(), r#"{"id":1}"#);

        let err = response.json::<Vec<u32>>().unwrap_err();
        assert!(matches!(err, LocusError::Decode { .. }));
        assert!(!err.is_network_error());
    }
}
