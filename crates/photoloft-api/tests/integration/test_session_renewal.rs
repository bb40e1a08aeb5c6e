//! End-to-end renewal behavior against a mock server: expired session is
//! renewed once, concurrent expiries share one renewal, and a renewal that
//! does not help surfaces the expiry instead of looping.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photoloft_api::order::ApiOrder;
use photoloft_api::photos::PhotosService;
use photoloft_core::domain::SessionHolder;
use photoloft_core::errors::ApiError;

use crate::common;

#[tokio::test]
async fn test_expired_session_is_renewed_and_call_retried() {
    let server = MockServer::start().await;
    common::mount_session_endpoint(&server, "S2", 1).await;
    common::mount_photos_for_session(&server, "S2", serde_json::json!([common::photo_json("p1")]))
        .await;

    let connection = common::connection(&server);
    let holder = SessionHolder::with_session(common::session("S1", &connection));
    let client = common::renewing_client(&server, holder.clone());
    let photos = PhotosService::new(client);

    let result = photos
        .get_photos(40, 0, ApiOrder::Newest, None)
        .await
        .expect("call should succeed after renewal");

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].uid, "p1");
    // The holder now carries the renewed session with its new tokens.
    let current = holder.get().expect("session present");
    assert_eq!(current.id, "S2");
    assert_eq!(current.preview_token, "pt-S2");
}

#[tokio::test]
async fn test_concurrent_expired_calls_share_one_renewal() {
    let server = MockServer::start().await;
    // The session endpoint must be hit exactly once for the whole burst.
    common::mount_session_endpoint(&server, "S2", 1).await;
    common::mount_photos_for_session(&server, "S2", serde_json::json!([common::photo_json("p1")]))
        .await;

    let connection = common::connection(&server);
    let holder = SessionHolder::with_session(common::session("S1", &connection));
    let client = common::renewing_client(&server, holder.clone());
    let photos = Arc::new(PhotosService::new(client));

    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let photos = photos.clone();
            tokio::spawn(async move { photos.get_photos(40, 0, ApiOrder::Newest, None).await })
        })
        .collect();

    for task in tasks {
        let result = task.await.expect("task panicked");
        assert_eq!(result.expect("call should succeed").len(), 1);
    }
    assert_eq!(holder.session_id().as_deref(), Some("S2"));
}

#[tokio::test]
async fn test_renewed_session_still_rejected_surfaces_expiry() {
    let server = MockServer::start().await;
    common::mount_session_endpoint(&server, "S2", 1).await;
    // Photos always 401, even for the renewed session.
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let connection = common::connection(&server);
    let holder = SessionHolder::with_session(common::session("S1", &connection));
    let client = common::renewing_client(&server, holder);
    let photos = PhotosService::new(client);

    let result = photos.get_photos(40, 0, ApiOrder::Newest, None).await;

    assert_eq!(
        result,
        Err(ApiError::SessionExpired {
            session_id: "S2".to_string()
        })
    );
}

#[tokio::test]
async fn test_renewal_with_bad_credentials_propagates_to_caller() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": "invalid credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let connection = common::connection(&server);
    let holder = SessionHolder::with_session(common::session("S1", &connection));
    let client = common::renewing_client(&server, holder);
    let photos = PhotosService::new(client);

    let result = photos.get_photos(40, 0, ApiOrder::Newest, None).await;
    assert_eq!(result, Err(ApiError::InvalidCredentials));
}

#[tokio::test]
async fn test_expiry_without_renewal_surfaces_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let connection = common::connection(&server);
    let holder = SessionHolder::with_session(common::session("S1", &connection));
    let client = common::plain_session_client(&server, holder);
    let photos = PhotosService::new(client);

    let result = photos.get_photos(40, 0, ApiOrder::Newest, None).await;
    assert_eq!(
        result,
        Err(ApiError::SessionExpired {
            session_id: "S1".to_string()
        })
    );
}
