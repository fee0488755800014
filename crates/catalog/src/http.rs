//! HTTP client for the catalog service.

use std::time::Duration;

use async_trait::async_trait;
use common::ArticleId;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};

use crate::article::ArticleSnapshot;
use crate::client::ArticleCatalog;
use crate::error::CatalogError;

/// Default per-request timeout for catalog lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Location and limits of the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL, e.g. `http://localhost:3002`.
    pub base_url: String,
    /// Timeout applied to each lookup.
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Creates a config for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Catalog client calling `GET {base_url}/v1/articles/{id}`.
#[derive(Debug, Clone)]
pub struct HttpArticleCatalog {
    client: Client,
    base_url: Url,
}

impl HttpArticleCatalog {
    /// Builds a client from explicit configuration.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::Config(format!(
                "{} cannot be used as a base URL",
                config.base_url
            )));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn article_url(&self, article_id: &ArticleId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", "articles", article_id.as_str()]);
        }
        url
    }
}

#[async_trait]
impl ArticleCatalog for HttpArticleCatalog {
    #[tracing::instrument(skip_all, fields(%article_id))]
    async fn lookup_article(
        &self,
        article_id: &ArticleId,
        auth_token: &str,
    ) -> Result<ArticleSnapshot, CatalogError> {
        let url = self.article_url(article_id);
        tracing::debug!(%url, "looking up article");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("bearer {auth_token}"))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                article_id: article_id.clone(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Malformed(e.to_string()))
    }
}
