//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cart::{CartError, ServiceError, StoreError};
use catalog::CatalogError;
use thiserror::Error;
use validation::ValidationReport;

use crate::auth::AuthError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or rejected credentials.
    Auth(AuthError),
    /// Cart service error.
    Cart(ServiceError),
    /// Checkout blocked by validation errors.
    ValidationFailed(ValidationReport),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Auth(err) => auth_error_to_response(err),
            ApiError::Cart(err) => cart_error_to_response(err),
            ApiError::ValidationFailed(report) => {
                return (StatusCode::BAD_REQUEST, axum::Json(report)).into_response();
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn auth_error_to_response(err: AuthError) -> (StatusCode, String) {
    match &err {
        AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
        AuthError::Unavailable(_) => {
            tracing::warn!(error = %err, "auth service failure");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

fn cart_error_to_response(err: ServiceError) -> (StatusCode, String) {
    match &err {
        ServiceError::Cart(cart_err) => match cart_err {
            CartError::ArticleNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            CartError::NotActive { .. } => (StatusCode::CONFLICT, err.to_string()),
            CartError::InvalidQuantity { .. } | CartError::EmptyArticleId | CartError::EmptyCart => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        },
        ServiceError::NoActiveCart(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::CartChanged { .. }
        | ServiceError::Store(
            StoreError::DuplicateActiveCart { .. } | StoreError::VersionConflict { .. },
        ) => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::Store(StoreError::Unavailable(_)) => {
            tracing::error!(error = %err, "cart store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

/// Errors raised while wiring the application at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Catalog client: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Auth client: {0}")]
    Auth(#[from] AuthError),
}
