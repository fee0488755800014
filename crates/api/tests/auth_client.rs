//! Tests for the HTTP authenticator against a mock auth service.

use std::sync::Arc;
use std::time::Duration;

use api::auth::{AuthError, Authenticator, HttpAuthenticator};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog::InMemoryArticleCatalog;
use common::UserId;
use httpmock::prelude::*;
use tower::ServiceExt;

fn authenticator(server: &MockServer) -> HttpAuthenticator {
    HttpAuthenticator::new(&server.base_url(), Duration::from_secs(1)).unwrap()
}

#[tokio::test]
async fn test_resolves_current_user() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/users/current")
                .header("authorization", "bearer token-1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "id": "user-1",
                    "name": "Ana",
                    "login": "ana",
                    "permissions": ["user"]
                }));
        })
        .await;

    let user = authenticator(&server).authenticate("token-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(user, UserId::new("user-1"));
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/users/current");
            then.status(401);
        })
        .await;

    let result = authenticator(&server).authenticate("expired").await;

    assert!(matches!(result, Err(AuthError::Unauthorized)));
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/users/current");
            then.status(500);
        })
        .await;

    let result = authenticator(&server).authenticate("token-1").await;

    assert!(matches!(result, Err(AuthError::Unavailable(_))));
}

#[tokio::test]
async fn test_unavailable_auth_service_maps_to_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/users/current");
            then.status(503);
        })
        .await;

    let state = api::create_state(
        Arc::new(InMemoryArticleCatalog::new()),
        Arc::new(authenticator(&server)),
        false,
    );
    let app = api::create_app(state, metrics_handle());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/cart")
                .header("authorization", "bearer token-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

fn metrics_handle() -> metrics_exporter_prometheus::PrometheusHandle {
    // A standalone recorder; this binary never installs a global one.
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle()
}
