//! Shared test helpers for photoloft-api integration tests
//!
//! Provides wiremock-based server setup plus a fully wired client with
//! session attach, expiry detection and automatic renewal.

use std::sync::Arc;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photoloft_api::client::{ApiClient, ApiClientBuilder, RenewalParams};
use photoloft_api::session_service::SessionService;
use photoloft_core::config::ApiConfig;
use photoloft_core::domain::{ConnectionParams, Credentials, Session, SessionHolder};

pub const SESSION_HEADER: &str = "X-Session-ID";

pub fn connection(server: &MockServer) -> ConnectionParams {
    ConnectionParams::new(server.uri().parse().expect("mock server URI"), None, None)
        .expect("connection params")
}

pub fn session(id: &str, connection: &ConnectionParams) -> Session {
    Session::new(id, "pt", "dt", connection.clone())
}

/// Builds a client with the full chain: renewal wired to the real session
/// endpoint on the mock server, attach and expiry against `holder`.
pub fn renewing_client(server: &MockServer, holder: SessionHolder) -> ApiClient {
    let connection = connection(server);
    let session_service = SessionService::with_plain_client(&connection, &ApiConfig::default())
        .expect("session service");

    let renewed_holder = holder.clone();
    let renewal = RenewalParams {
        session_creator: Arc::new(session_service),
        credentials_provider: Arc::new(|| {
            Ok(Credentials {
                username: "user".to_string(),
                password: "secret".to_string(),
            })
        }),
        on_session_renewed: Some(Arc::new(move |session: &Session| {
            renewed_holder.apply_renewal(session)
        })),
    };

    ApiClientBuilder::new(connection)
        .with_session(holder)
        .with_renewal(renewal)
        .build()
        .expect("client build")
}

/// Builds a session-aware client without renewal.
pub fn plain_session_client(server: &MockServer, holder: SessionHolder) -> ApiClient {
    ApiClientBuilder::new(connection(server))
        .with_session(holder)
        .build()
        .expect("client build")
}

/// Mounts `POST /api/v1/session` returning a fresh session `id`, expected to
/// be hit exactly `expected_calls` times.
pub async fn mount_session_endpoint(server: &MockServer, id: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id,
            "config": {
                "previewToken": format!("pt-{id}"),
                "downloadToken": format!("dt-{id}")
            }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mounts `GET /api/v1/photos` so that session `valid_id` gets `photos` and
/// any other session id gets a 401.
pub async fn mount_photos_for_session(
    server: &MockServer,
    valid_id: &str,
    photos: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .and(header(SESSION_HEADER, valid_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "unauthorized"
        })))
        .mount(server)
        .await;
}

pub fn photo_json(uid: &str) -> serde_json::Value {
    serde_json::json!({
        "UID": uid,
        "Title": format!("Photo {uid}"),
        "Type": "image",
        "TakenAt": "2024-06-01T12:00:00Z",
        "Favorite": false,
        "Hash": format!("hash-{uid}")
    })
}
