//! Stateless interceptors: header injection, session attach and session
//! expiry detection.
//!
//! The renewal interceptor lives in [`crate::renewal`]; everything here is a
//! pure request/response transformation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use photoloft_core::domain::SessionHolder;
use photoloft_core::errors::{shorten_id, ApiError};

use crate::chain::{Interceptor, Next};
use crate::request::{ApiRequest, ApiResponse, SESSION_ID_HEADER};

/// Sets a single header on every request, computing the value lazily at call
/// time.
pub struct HeaderInterceptor {
    name: String,
    value: Arc<dyn Fn() -> String + Send + Sync>,
}

impl HeaderInterceptor {
    pub fn new(
        name: impl Into<String>,
        value: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(value),
        }
    }

    /// `User-Agent` built from a product string, optionally extended with a
    /// platform suffix.
    pub fn user_agent(product: impl Into<String>, extension: Option<String>) -> Self {
        let product = product.into();
        let value = match extension {
            Some(extension) => format!("{product} ({extension})"),
            None => product,
        };
        Self::new("User-Agent", move || value.clone())
    }

    /// `Authorization` header for a reverse proxy in front of the library.
    pub fn authorization(value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new("Authorization", move || value.clone())
    }
}

#[async_trait]
impl Interceptor for HeaderInterceptor {
    async fn intercept(
        &self,
        request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        next.run(request.with_header(&self.name, (self.value)()))
            .await
    }
}

/// Attaches the current session id from the shared holder.
///
/// The holder is read on every request, never captured, so the id attached
/// after a renewal is always the renewed one.
pub struct SessionAttachInterceptor {
    holder: SessionHolder,
}

impl SessionAttachInterceptor {
    pub fn new(holder: SessionHolder) -> Self {
        Self { holder }
    }
}

#[async_trait]
impl Interceptor for SessionAttachInterceptor {
    async fn intercept(
        &self,
        request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let request = match self.holder.session_id() {
            Some(id) if !id.is_empty() => request.with_header(SESSION_ID_HEADER, id),
            _ => request,
        };
        next.run(request).await
    }
}

/// Translates a 401 response on a session-carrying request into
/// [`ApiError::SessionExpired`].
///
/// Requests that carried no session id pass the 401 through untouched; those
/// are credential problems, not expiry.
pub struct SessionExpiryInterceptor;

#[async_trait]
impl Interceptor for SessionExpiryInterceptor {
    async fn intercept(
        &self,
        request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError> {
        let session_id = request.header(SESSION_ID_HEADER).map(str::to_string);
        let response = next.run(request).await?;

        if response.status == StatusCode::UNAUTHORIZED {
            if let Some(session_id) = session_id.filter(|id| !id.is_empty()) {
                debug!(
                    session_id = %shorten_id(&session_id),
                    "session rejected by the server, flagging as expired"
                );
                return Err(ApiError::SessionExpired { session_id });
            }
        }
        Ok(response)
    }
}
