//! Error taxonomy of the API access layer
//!
//! A single [`ApiError`] enum flows through the transport, the interceptor
//! chain and the repositories. The variants map to the failure classes the
//! layer distinguishes:
//!
//! - [`ApiError::Http`] - a non-2xx response, the terminal outcome of a call
//! - [`ApiError::SessionExpired`] - internal control-flow signal driving the
//!   renewal-and-retry machinery; it never escapes the interceptor chain of a
//!   session-aware client
//! - [`ApiError::InvalidCredentials`] - the session service rejected the
//!   stored credentials
//! - [`ApiError::Network`] / [`ApiError::Decode`] - transport and
//!   deserialization failures
//! - [`ApiError::Invariant`] - a programming error, not an expected runtime
//!   condition

use thiserror::Error;

/// Errors produced by the API access layer.
///
/// The type is `Clone` so a single failure can be re-raised verbatim to every
/// caller waiting on a shared renewal episode and broadcast on repository
/// error channels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A response with status >= 400.
    ///
    /// Carries the status code, the canonical status text and the raw error
    /// body for diagnostics.
    #[error("HTTP {status} {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Canonical status text (e.g. "Not Found")
        message: String,
        /// Raw response body, useful for diagnostics
        body: String,
    },

    /// The attached session id was rejected with 401.
    ///
    /// Raised by the expiry detector and consumed by the renewal interceptor;
    /// callers outside the chain only see it if renewal-and-retry is not
    /// configured or the retried request expired again.
    #[error("the session '{}...' has expired", shorten_id(.session_id))]
    SessionExpired {
        /// The session id that the server no longer accepts
        session_id: String,
    },

    /// The session service rejected the supplied credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A connectivity-level failure (DNS, TLS, timeout, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be deserialized into the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// An internal invariant did not hold. Signals a bug rather than an
    /// expected runtime condition.
    #[error("invariant violation: {0}")]
    Invariant(String),
}

impl ApiError {
    /// Creates an [`ApiError::Http`] from the parts of a failed response.
    pub fn http(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Creates an [`ApiError::Network`] from any displayable source.
    pub fn network(source: impl std::fmt::Display) -> Self {
        ApiError::Network(source.to_string())
    }

    /// Creates an [`ApiError::Decode`] from any displayable source.
    pub fn decode(source: impl std::fmt::Display) -> Self {
        ApiError::Decode(source.to_string())
    }

    /// Creates an [`ApiError::Invariant`] with the given message.
    pub fn invariant(message: impl Into<String>) -> Self {
        ApiError::Invariant(message.into())
    }

    /// Returns the HTTP status code if this is an [`ApiError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is an HTTP error with the given status code.
    pub fn is_http_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }
}

/// Truncates a session id for log and error output.
///
/// Session ids are secrets; only a short prefix is ever printed.
pub fn shorten_id(id: &str) -> String {
    id.chars().take(5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ApiError::http(404, "Not Found", "{\"error\":\"no such album\"}");
        assert_eq!(err.to_string(), "HTTP 404 Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.is_http_status(404));
        assert!(!err.is_http_status(401));
    }

    #[test]
    fn test_session_expired_display_truncates_id() {
        let err = ApiError::SessionExpired {
            session_id: "0123456789abcdef".to_string(),
        };
        assert_eq!(err.to_string(), "the session '01234...' has expired");
    }

    #[test]
    fn test_session_expired_display_short_id() {
        let err = ApiError::SessionExpired {
            session_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "the session 'abc...' has expired");
    }

    #[test]
    fn test_error_clone_and_equality() {
        let err = ApiError::http(500, "Internal Server Error", "");
        assert_eq!(err, err.clone());

        let other = ApiError::http(502, "Bad Gateway", "");
        assert_ne!(err, other);
    }

    #[test]
    fn test_invariant_display() {
        let err = ApiError::invariant("renewal finished with neither a session nor an error");
        assert_eq!(
            err.to_string(),
            "invariant violation: renewal finished with neither a session nor an error"
        );
    }
}
