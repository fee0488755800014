//! HTTP API for the cart service.
//!
//! Provides REST endpoints for managing the caller's cart and a
//! validation gate that checks every line against the article catalog
//! before `/cart/validate` and `/cart/checkout` run. Structured logging via
//! tracing and Prometheus metrics are included.

pub mod auth;
pub mod config;
pub mod error;
pub mod notifier;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use cart::{CartService, CartStore, InMemoryCartStore};
use catalog::{ArticleCatalog, HttpArticleCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use validation::ValidationPipeline;

use auth::{Authenticator, HttpAuthenticator};
use config::Config;
use error::StartupError;
use notifier::ValidationNotifier;
use routes::cart::AppState;

/// Cart service over a type-erased store.
pub type SharedCartService = CartService<Arc<dyn CartStore>>;

/// Validation pipeline over a type-erased catalog client.
pub type SharedPipeline = ValidationPipeline<Arc<dyn ArticleCatalog>>;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let gated = Router::new()
        .route("/cart/validate", post(routes::cart::validate))
        .route("/cart/checkout", post(routes::cart::checkout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::cart::validation_gate,
        ));

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart", get(routes::cart::get))
        .route("/cart/article", post(routes::cart::add_article))
        .route(
            "/cart/article/{article_id}",
            delete(routes::cart::remove_article),
        )
        .route(
            "/cart/article/{article_id}/increment",
            post(routes::cart::increment),
        )
        .route(
            "/cart/article/{article_id}/decrement",
            post(routes::cart::decrement),
        )
        .merge(gated)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state around the given collaborators.
///
/// Carts are kept in memory.
pub fn create_state(
    catalog: Arc<dyn ArticleCatalog>,
    authenticator: Arc<dyn Authenticator>,
    background_validation: bool,
) -> Arc<AppState> {
    let store: Arc<dyn CartStore> = Arc::new(InMemoryCartStore::new());
    let cart_service = Arc::new(CartService::new(store));
    let pipeline = Arc::new(ValidationPipeline::new(catalog));
    let notifier =
        ValidationNotifier::new(background_validation, pipeline.clone(), cart_service.clone());

    Arc::new(AppState {
        cart_service,
        pipeline,
        authenticator,
        notifier,
    })
}

/// Creates application state with HTTP clients for the catalog and auth
/// services described by `config`.
pub fn create_default_state(config: &Config) -> Result<Arc<AppState>, StartupError> {
    let catalog = HttpArticleCatalog::new(config.catalog_config())?;
    let authenticator = HttpAuthenticator::new(&config.auth_url, config.catalog_timeout)?;

    Ok(create_state(
        Arc::new(catalog),
        Arc::new(authenticator),
        config.background_validation,
    ))
}
