//! The API client: a thin call adapter over the interceptor chain that maps
//! non-2xx responses to structured errors, plus the builder assembling the
//! standard chain.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use photoloft_core::config::ApiConfig;
use photoloft_core::domain::{ConnectionParams, Credentials, Session, SessionHolder};
use photoloft_core::errors::ApiError;
use photoloft_core::ports::ObjectPersistence;

use crate::chain::{InterceptorChain, Transport};
use crate::interceptors::{HeaderInterceptor, SessionAttachInterceptor, SessionExpiryInterceptor};
use crate::renewal::{CredentialsProvider, OnSessionRenewed, SessionCreator, SessionRenewalInterceptor};
use crate::request::{ApiRequest, ApiResponse};
use crate::transport::ReqwestTransport;

/// Versioned API client bound to one library instance.
///
/// Cloning is cheap; clones share the chain and its renewal state.
#[derive(Clone)]
pub struct ApiClient {
    chain: Arc<InterceptorChain>,
    api_base: Url,
}

impl ApiClient {
    /// Wraps a prepared chain; `api_base` becomes `<root>/api/v1/`.
    pub fn new(connection: &ConnectionParams, chain: InterceptorChain) -> Result<Self, ApiError> {
        let api_base = connection
            .api_url()
            .join("v1/")
            .map_err(|e| ApiError::invariant(format!("cannot build API base URL: {e}")))?;
        Ok(Self {
            chain: Arc::new(chain),
            api_base,
        })
    }

    /// Resolves a relative endpoint path against the API base.
    pub fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        self.api_base
            .join(path)
            .map_err(|e| ApiError::invariant(format!("invalid endpoint path '{path}': {e}")))
    }

    /// Runs a request through the chain without status mapping.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.chain.execute(request).await
    }

    /// Runs a request and maps any non-success status to [`ApiError::Http`].
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "executing API call");
        let response = self.send(request).await?;
        Self::error_for_status(response)
    }

    /// GET an endpoint and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.url_for(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value);
            }
        }
        let response = self.execute(ApiRequest::get(url)).await?;
        Self::decode(&response)
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url_for(path)?;
        let request = ApiRequest::post(url).with_json_body(body)?;
        let response = self.execute(request).await?;
        Self::decode(&response)
    }

    /// DELETE an endpoint, discarding the response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url_for(path)?;
        self.execute(ApiRequest::delete(url)).await?;
        Ok(())
    }

    fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
        if response.body.is_empty() {
            return Err(ApiError::invariant(
                "response body is empty despite a success status",
            ));
        }
        response.json()
    }

    fn error_for_status(response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if response.status.is_client_error() || response.status.is_server_error() {
            let message = response
                .status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string();
            return Err(ApiError::Http {
                status: response.status.as_u16(),
                message,
                body: response.body_text(),
            });
        }
        Ok(response)
    }
}

/// Everything the builder needs to enable automatic session renewal.
pub struct RenewalParams {
    pub session_creator: Arc<dyn SessionCreator>,
    pub credentials_provider: CredentialsProvider,
    pub on_session_renewed: Option<OnSessionRenewed>,
}

impl RenewalParams {
    /// Wires renewal to the persistence ports: credentials are read from
    /// `credentials_store` when a renewal fires, and every renewed session
    /// is applied to `session_holder` and written back to `session_store`.
    ///
    /// A failure to persist the renewed session is logged but does not fail
    /// the renewal; the in-memory holder is already up to date.
    pub fn from_stores(
        session_creator: Arc<dyn SessionCreator>,
        credentials_store: Arc<dyn ObjectPersistence<Credentials>>,
        session_holder: SessionHolder,
        session_store: Arc<dyn ObjectPersistence<Session>>,
    ) -> Self {
        let credentials_provider: CredentialsProvider = Arc::new(move || {
            credentials_store
                .load_item()?
                .ok_or_else(|| anyhow::anyhow!("no credentials stored"))
        });
        let on_session_renewed: OnSessionRenewed = Arc::new(move |session: &Session| {
            session_holder.apply_renewal(session);
            if let Err(e) = session_store.save_item(session) {
                warn!(error = %e, "failed to persist renewed session");
            }
        });
        Self {
            session_creator,
            credentials_provider,
            on_session_renewed: Some(on_session_renewed),
        }
    }
}

/// Assembles the standard interceptor chain:
///
/// 1. `User-Agent` header
/// 2. proxy `Authorization` header (when configured)
/// 3. session renewal (when a session holder and renewal params are set)
/// 4. session attach
/// 5. session expiry detection
///
/// The renewal interceptor sits outside attach/expiry so its retry picks up
/// the renewed id from the holder.
pub struct ApiClientBuilder {
    connection: ConnectionParams,
    config: ApiConfig,
    session: Option<SessionHolder>,
    renewal: Option<RenewalParams>,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    pub fn new(connection: ConnectionParams) -> Self {
        Self {
            connection,
            config: ApiConfig::default(),
            session: None,
            renewal: None,
            transport: None,
        }
    }

    pub fn with_config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables session attach and expiry detection against `holder`.
    pub fn with_session(mut self, holder: SessionHolder) -> Self {
        self.session = Some(holder);
        self
    }

    /// Enables automatic renewal. Has no effect without a session holder.
    pub fn with_renewal(mut self, renewal: RenewalParams) -> Self {
        self.renewal = Some(renewal);
        self
    }

    /// Replaces the default HTTP transport, mainly for tests.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };

        let mut chain = InterceptorChain::new(transport).with_interceptor(Arc::new(
            HeaderInterceptor::user_agent(self.config.user_agent.clone(), None),
        ));

        if let Some(http_auth) = &self.connection.http_auth {
            chain = chain.with_interceptor(Arc::new(HeaderInterceptor::authorization(http_auth)));
        }

        if let Some(holder) = self.session {
            if let Some(renewal) = self.renewal {
                chain = chain.with_interceptor(Arc::new(SessionRenewalInterceptor::new(
                    renewal.session_creator,
                    renewal.credentials_provider,
                    renewal.on_session_renewed,
                )));
            }
            chain = chain
                .with_interceptor(Arc::new(SessionAttachInterceptor::new(holder)))
                .with_interceptor(Arc::new(SessionExpiryInterceptor));
        }

        ApiClient::new(&self.connection, chain)
    }
}
