//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::Client;

use photoloft_core::config::ApiConfig;
use photoloft_core::errors::ApiError;

use crate::chain::Transport;
use crate::request::{ApiRequest, ApiResponse};

/// The production [`Transport`]: one shared `reqwest` client with the
/// configured timeouts.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.call_timeout())
            .build()
            .map_err(ApiError::network)?;
        Ok(Self { client })
    }

    /// Wraps an already-configured client, e.g. one carrying a client
    /// certificate.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self.client.request(request.method.clone(), request.url.clone());
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(ApiError::network)?;

        let status = response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(ApiError::network)?;

        let mut api_response = ApiResponse::new(status).with_body(body.to_vec());
        for (name, value) in headers {
            api_response = api_response.with_header(name, value);
        }
        Ok(api_response)
    }
}
