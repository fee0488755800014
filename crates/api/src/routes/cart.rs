//! Cart endpoints and the pre-checkout validation gate.

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};
use cart::{Cart, CartRevision, LineItem};
use chrono::{DateTime, Utc};
use common::ArticleId;
use serde::{Deserialize, Serialize};
use validation::ValidationReport;

use crate::auth::{Authenticator, Session};
use crate::error::ApiError;
use crate::notifier::ValidationNotifier;
use crate::{SharedCartService, SharedPipeline};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub cart_service: Arc<SharedCartService>,
    pub pipeline: Arc<SharedPipeline>,
    pub authenticator: Arc<dyn Authenticator>,
    pub notifier: ValidationNotifier,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddArticleRequest {
    pub article_id: String,
    pub quantity: u32,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub id: String,
    pub user_id: String,
    pub state: String,
    pub order_id: Option<String>,
    pub articles: Vec<LineItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            id: cart.id().to_string(),
            user_id: cart.user_id().to_string(),
            state: cart.state().to_string(),
            order_id: cart.order_id().map(|id| id.to_string()),
            articles: cart.lines().to_vec(),
            created_at: cart.created_at(),
            updated_at: cart.updated_at(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
}

// -- Handlers --

/// GET /cart — return the caller's cart, creating it on first access.
///
/// Also kicks off background confirmation of unvalidated lines.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.cart_service.current_cart(&session.user_id).await?;
    state.notifier.notify(&cart, &session.token);
    Ok(Json(CartResponse::from(&cart)))
}

/// POST /cart/article — add an article, merging with an existing line.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn add_article(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<AddArticleRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart_service
        .add_article(&session.user_id, ArticleId::new(req.article_id), req.quantity)
        .await?;
    Ok(Json(CartResponse::from(&cart)))
}

/// POST /cart/article/{article_id}/increment — add one unit.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %article_id))]
pub async fn increment(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(article_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart_service
        .increment(&session.user_id, &ArticleId::new(article_id))
        .await?;
    Ok(Json(CartResponse::from(&cart)))
}

/// POST /cart/article/{article_id}/decrement — remove one unit, dropping the
/// line at zero.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %article_id))]
pub async fn decrement(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(article_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart_service
        .decrement(&session.user_id, &ArticleId::new(article_id))
        .await?;
    Ok(Json(CartResponse::from(&cart)))
}

/// DELETE /cart/article/{article_id} — remove the line.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id, %article_id))]
pub async fn remove_article(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(article_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .cart_service
        .remove_article(&session.user_id, &ArticleId::new(article_id))
        .await?;
    Ok(Json(CartResponse::from(&cart)))
}

/// Middleware that validates the caller's cart before the handler runs.
///
/// Inserts the `Session`, the `ValidationReport` and the `CartRevision` the
/// report was computed for as request extensions.
pub async fn validation_gate(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cart = state.cart_service.current_cart(&session.user_id).await?;
    let report = state.pipeline.validate(cart.lines(), &session.token).await;

    tracing::info!(
        cart_id = %cart.id(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "cart validation gate"
    );

    request.extensions_mut().insert(report);
    request.extensions_mut().insert(cart.revision());
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// POST /cart/validate — return the report computed by the gate.
pub async fn validate(Extension(report): Extension<ValidationReport>) -> Json<ValidationReport> {
    Json(report)
}

/// POST /cart/checkout — close the cart unless validation found errors.
///
/// Only the cart exactly as the gate validated it is closed. Any change in
/// between is answered with 409.
#[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Extension(report): Extension<ValidationReport>,
    Extension(revision): Extension<CartRevision>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    if !report.is_valid() {
        metrics::counter!("cart_checkouts_blocked_total").increment(1);
        tracing::info!(errors = report.errors.len(), "checkout blocked by validation");
        return Err(ApiError::ValidationFailed(report));
    }

    let order_id = state
        .cart_service
        .checkout(&session.user_id, revision)
        .await?;
    Ok(Json(CheckoutResponse {
        order_id: order_id.to_string(),
    }))
}
