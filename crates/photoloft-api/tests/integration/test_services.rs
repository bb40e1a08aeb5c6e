//! Integration tests for the typed services over a real HTTP round trip.

use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use photoloft_api::albums::AlbumsService;
use photoloft_api::client::ApiClientBuilder;
use photoloft_api::order::ApiOrder;
use photoloft_api::photos::PhotosService;
use photoloft_api::session_service::SessionService;
use photoloft_core::config::ApiConfig;
use photoloft_core::domain::{Credentials, SessionHolder};
use photoloft_core::errors::ApiError;

use crate::common;

#[tokio::test]
async fn test_create_and_delete_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .and(body_json(serde_json::json!({
            "username": "user",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "S1",
            "config": {"previewToken": "pt", "downloadToken": "dt"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/session/S1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let connection = common::connection(&server);
    let service =
        SessionService::with_plain_client(&connection, &ApiConfig::default()).expect("service");

    let session = service
        .create_session(&Credentials {
            username: "user".to_string(),
            password: "secret".to_string(),
        })
        .await
        .expect("login");
    assert_eq!(session.id, "S1");
    assert_eq!(session.preview_token, "pt");

    service.delete_session(&session.id).await.expect("logout");
}

#[tokio::test]
async fn test_login_rejection_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": "invalid credentials"})),
        )
        .mount(&server)
        .await;

    let connection = common::connection(&server);
    let service =
        SessionService::with_plain_client(&connection, &ApiConfig::default()).expect("service");

    let result = service
        .create_session(&Credentials {
            username: "user".to_string(),
            password: "wrong".to_string(),
        })
        .await;
    assert_eq!(result, Err(ApiError::InvalidCredentials));
}

#[tokio::test]
async fn test_photos_page_with_session_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .and(header(common::SESSION_HEADER, "S1"))
        .and(query_param("count", "2"))
        .and(query_param("offset", "4"))
        .and(query_param("order", "oldest"))
        .and(query_param("q", "label:beach"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            common::photo_json("p1"),
            common::photo_json("p2")
        ])))
        .mount(&server)
        .await;

    let connection = common::connection(&server);
    let holder = SessionHolder::with_session(common::session("S1", &connection));
    let client = common::plain_session_client(&server, holder);
    let photos = PhotosService::new(client);

    let page = photos
        .get_photos(2, 4, ApiOrder::Oldest, Some("label:beach"))
        .await
        .expect("photos page");
    assert_eq!(page.len(), 2);
    assert_eq!(page[1].uid, "p2");
}

#[tokio::test]
async fn test_albums_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/albums"))
        .and(query_param("type", "folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"UID": "f1", "Title": "2024", "Favorite": false, "Type": "folder"}
        ])))
        .mount(&server)
        .await;

    let client = ApiClientBuilder::new(common::connection(&server))
        .build()
        .expect("client");
    let albums = AlbumsService::new(client);

    let page = albums
        .get_albums(40, 0, ApiOrder::Newest, "folder")
        .await
        .expect("albums page");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].album_type, "folder");
}

#[tokio::test]
async fn test_server_error_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/photos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = ApiClientBuilder::new(common::connection(&server))
        .build()
        .expect("client");
    let photos = PhotosService::new(client);

    let result = photos.get_photos(1, 0, ApiOrder::Newest, None).await;
    assert_eq!(
        result,
        Err(ApiError::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
            body: "boom".to_string(),
        })
    );
}
