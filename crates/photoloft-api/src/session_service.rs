//! Session lifecycle endpoints: login, logout and the [`SessionCreator`]
//! implementation used by automatic renewal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use photoloft_core::config::ApiConfig;
use photoloft_core::domain::{ConnectionParams, Credentials, Session};
use photoloft_core::errors::{shorten_id, ApiError};

use crate::client::{ApiClient, ApiClientBuilder};
use crate::renewal::SessionCreator;

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    id: String,
    #[serde(default)]
    config: SessionConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionConfig {
    #[serde(default)]
    preview_token: String,
    #[serde(default)]
    download_token: String,
}

/// Creates and destroys sessions on one library instance.
///
/// The client handed to this service must NOT carry session attach or
/// renewal interceptors: a login request retried through renewal would
/// recurse.
pub struct SessionService {
    client: ApiClient,
    connection: ConnectionParams,
}

impl SessionService {
    pub fn new(client: ApiClient, connection: ConnectionParams) -> Self {
        Self { client, connection }
    }

    /// Builds the service on a plain, session-unaware client.
    pub fn with_plain_client(
        connection: &ConnectionParams,
        config: &ApiConfig,
    ) -> Result<Self, ApiError> {
        let client = ApiClientBuilder::new(connection.clone())
            .with_config(config.clone())
            .build()?;
        Ok(Self::new(client, connection.clone()))
    }

    /// Logs in with `credentials` and returns the fresh session.
    ///
    /// A 401 carrying a JSON body is the server rejecting the credentials
    /// themselves and maps to [`ApiError::InvalidCredentials`]; any other
    /// 401 (e.g. from a proxy in front) stays an HTTP error.
    pub async fn create_session(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = SessionRequest {
            username: &credentials.username,
            password: &credentials.password,
        };

        let result: Result<SessionResponse, ApiError> =
            self.client.post_json("session", &request).await;

        let response = match result {
            Err(ApiError::Http { status: 401, body, .. }) if looks_like_json(&body) => {
                return Err(ApiError::InvalidCredentials);
            }
            other => other?,
        };

        info!(session_id = %shorten_id(&response.id), "session created");
        Ok(Session::new(
            response.id,
            response.config.preview_token,
            response.config.download_token,
            self.connection.clone(),
        ))
    }

    /// Invalidates a session on the server. The local holder is untouched.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("session/{session_id}"))
            .await?;
        info!(session_id = %shorten_id(session_id), "session deleted");
        Ok(())
    }
}

fn looks_like_json(body: &str) -> bool {
    body.trim_start().starts_with('{')
}

#[async_trait]
impl SessionCreator for SessionService {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        SessionService::create_session(self, credentials).await
    }
}
