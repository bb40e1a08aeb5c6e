//! The interceptor chain: an explicit ordered list of middleware composed
//! around the transport call.
//!
//! Each interceptor may inspect or transform the request, delegate to the
//! rest of the chain via [`Next`], and inspect or transform (or replace with
//! an error) the resulting response. Interceptors run on whichever task
//! initiated the call; there is no queueing layer in between.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use photoloft_core::errors::ApiError;

use crate::request::{ApiRequest, ApiResponse};

/// A single link of the chain.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Handles `request`, usually by delegating to `next` at least once.
    ///
    /// Implementations are free to short-circuit with an error or to
    /// re-delegate (the renewal interceptor delegates a second time for its
    /// retry).
    async fn intercept(
        &self,
        request: ApiRequest,
        next: Next<'_>,
    ) -> Result<ApiResponse, ApiError>;
}

/// The terminal element of every chain: something that actually performs the
/// HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// An ordered list of interceptors in front of a transport.
///
/// Interceptors added first are outermost: they see the request first and
/// the response last.
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
}

impl InterceptorChain {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            interceptors: Vec::new(),
            transport,
        }
    }

    /// Appends an interceptor to the end (innermost position) of the chain.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Runs `request` through the full chain and the transport.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        Next {
            chain: self,
            index: 0,
        }
        .run(request)
        .await
    }
}

/// Continuation handed to each interceptor, pointing at the rest of the
/// chain.
///
/// `Next` is `Copy`, so an interceptor can delegate more than once with the
/// same continuation (the renewal retry relies on this).
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a InterceptorChain,
    index: usize,
}

impl<'a> Next<'a> {
    /// Delegates to the remaining interceptors and finally the transport.
    pub fn run(self, request: ApiRequest) -> BoxFuture<'a, Result<ApiResponse, ApiError>> {
        Box::pin(async move {
            match self.chain.interceptors.get(self.index) {
                Some(interceptor) => {
                    let next = Next {
                        chain: self.chain,
                        index: self.index + 1,
                    };
                    interceptor.intercept(request, next).await
                }
                None => self.chain.transport.execute(request).await,
            }
        })
    }
}
