//! Tests for the HTTP catalog client against a mock catalog service.

use std::time::Duration;

use catalog::{
    ArticleCatalog, ArticleId, ArticleSnapshot, CatalogConfig, CatalogError, HttpArticleCatalog,
};
use httpmock::prelude::*;

fn client(server: &MockServer) -> HttpArticleCatalog {
    HttpArticleCatalog::new(CatalogConfig::new(server.base_url())).unwrap()
}

#[tokio::test]
async fn test_lookup_success_sends_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/articles/A")
                .header("authorization", "bearer token-123");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "_id": "A",
                    "name": "Widget",
                    "price": 12.5,
                    "enabled": true,
                    "stock": 10
                }));
        })
        .await;

    let snapshot = client(&server)
        .lookup_article(&ArticleId::new("A"), "token-123")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshot, ArticleSnapshot::new("A", true, 10));
}

#[tokio::test]
async fn test_lookup_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/articles/missing");
            then.status(404);
        })
        .await;

    let result = client(&server)
        .lookup_article(&ArticleId::new("missing"), "token")
        .await;

    assert_eq!(
        result,
        Err(CatalogError::NotFound {
            article_id: ArticleId::new("missing")
        })
    );
}

#[tokio::test]
async fn test_lookup_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/articles/A");
            then.status(503);
        })
        .await;

    let result = client(&server)
        .lookup_article(&ArticleId::new("A"), "token")
        .await;

    assert_eq!(result, Err(CatalogError::Status { status: 503 }));
}

#[tokio::test]
async fn test_lookup_malformed_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/articles/A");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"_id":"A","enabled":"yes"}"#);
        })
        .await;

    let result = client(&server)
        .lookup_article(&ArticleId::new("A"), "token")
        .await;

    assert!(matches!(result, Err(CatalogError::Malformed(_))));
}

#[tokio::test]
async fn test_lookup_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/articles/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(serde_json::json!({ "_id": "slow", "enabled": true, "stock": 1 }));
        })
        .await;

    let catalog = HttpArticleCatalog::new(
        CatalogConfig::new(server.base_url()).with_timeout(Duration::from_millis(50)),
    )
    .unwrap();

    let result = catalog
        .lookup_article(&ArticleId::new("slow"), "token")
        .await;

    assert_eq!(result, Err(CatalogError::Timeout));
}

#[tokio::test]
async fn test_lookup_unreachable_catalog() {
    let catalog = HttpArticleCatalog::new(
        CatalogConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2)),
    )
    .unwrap();

    let result = catalog.lookup_article(&ArticleId::new("A"), "token").await;

    assert!(matches!(
        result,
        Err(CatalogError::Transport(_) | CatalogError::Timeout)
    ));
}
