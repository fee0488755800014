//! Session resolution against the auth service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use common::UserId;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::error::ApiError;
use crate::routes::cart::AppState;

/// Errors raised while resolving a session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is missing, expired, or unknown.
    #[error("Unauthorized")]
    Unauthorized,

    /// The auth service could not be reached or answered unexpectedly.
    #[error("Auth service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves bearer tokens to users.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the user owning the token.
    async fn authenticate(&self, token: &str) -> Result<UserId, AuthError>;
}

/// Authenticator calling `GET {base_url}/v1/users/current`.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: Client,
    current_user_url: Url,
}

#[derive(Deserialize)]
struct CurrentUser {
    id: String,
}

impl HttpAuthenticator {
    /// Builds a client for the auth service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let current_user_url = Url::parse(base_url)
            .and_then(|url| url.join("v1/users/current"))
            .map_err(|e| AuthError::Unavailable(format!("invalid auth URL {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            current_user_url,
        })
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    #[tracing::instrument(skip_all)]
    async fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        let response = self
            .client
            .get(self.current_user_url.clone())
            .header(AUTHORIZATION, format!("bearer {token}"))
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::Unauthorized),
            status if !status.is_success() => Err(AuthError::Unavailable(format!(
                "auth service responded with status {status}"
            ))),
            _ => {
                let user: CurrentUser = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Unavailable(e.to_string()))?;
                Ok(UserId::new(user.id))
            }
        }
    }
}

/// Authenticator backed by a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    sessions: HashMap<String, UserId>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `token` as belonging to `user_id`.
    pub fn with_session(mut self, token: impl Into<String>, user_id: impl Into<UserId>) -> Self {
        self.sessions.insert(token.into(), user_id.into());
        self
    }
}

#[async_trait]
impl Authenticator for StaticAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        self.sessions
            .get(token)
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    /// Raw bearer token, forwarded to downstream services.
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::Unauthorized)?;
        let user_id = state.authenticator.authenticate(&token).await?;
        Ok(Session { user_id, token })
    }
}

/// Extracts the token from an `Authorization: bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}
