//! Request and response values flowing through the interceptor chain.
//!
//! These are deliberately plain data: interceptors clone and transform them
//! without touching the underlying HTTP library, which keeps the chain fully
//! testable with fake transports.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use photoloft_core::errors::ApiError;

/// Header carrying the current session id on every authenticated request.
pub const SESSION_ID_HEADER: &str = "X-Session-ID";

/// Private marker header set on the single automatic retry after a session
/// renewal. Its presence on an expired request means the retry has already
/// been spent.
pub const SESSION_RENEWAL_RETRY_HEADER: &str = "X-Session-Renewal-Retry";

/// An outgoing request, before and during interception.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Returns the value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Serializes `body` as the JSON request body.
    pub fn with_json_body<B: Serialize>(self, body: &B) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(ApiError::decode)?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_body(bytes))
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// A completed response as seen by the interceptor chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Returns the value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body decoded as (lossy) UTF-8, for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(ApiError::decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://photos.example.com/api/v1/photos").unwrap()
    }

    #[test]
    fn test_with_header_replaces_existing() {
        let request = ApiRequest::get(url())
            .with_header(SESSION_ID_HEADER, "S1")
            .with_header(SESSION_ID_HEADER, "S2");
        assert_eq!(request.header(SESSION_ID_HEADER), Some("S2"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = ApiRequest::get(url()).with_header("X-Session-ID", "S1");
        assert_eq!(request.header("x-session-id"), Some("S1"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = ApiRequest::post(url())
            .with_json_body(&serde_json::json!({"username": "a"}))
            .unwrap();
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert!(request.body.is_some());
    }

    #[test]
    fn test_response_json_decode_error() {
        let response = ApiResponse::new(StatusCode::OK).with_body(b"not json".to_vec());
        let result: Result<serde_json::Value, _> = response.json();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
