//! In-memory catalog for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::ArticleId;

use crate::article::ArticleSnapshot;
use crate::client::ArticleCatalog;
use crate::error::CatalogError;

#[derive(Debug, Clone, Default)]
struct CatalogData {
    responses: HashMap<ArticleId, Result<ArticleSnapshot, CatalogError>>,
    delays: HashMap<ArticleId, Duration>,
    required_token: Option<String>,
}

/// In-memory article catalog.
///
/// Configured up front through the `with_*` builders. Unknown articles
/// resolve to `CatalogError::NotFound`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArticleCatalog {
    data: Arc<CatalogData>,
    lookups: Arc<AtomicUsize>,
}

impl InMemoryArticleCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an article under its own ID.
    pub fn with_article(self, snapshot: ArticleSnapshot) -> Self {
        let id = snapshot.id.clone();
        self.with_response(id, snapshot)
    }

    /// Answers lookups of `requested` with the given snapshot, whatever its ID.
    pub fn with_response(
        mut self,
        requested: impl Into<ArticleId>,
        snapshot: ArticleSnapshot,
    ) -> Self {
        self.data_mut()
            .responses
            .insert(requested.into(), Ok(snapshot));
        self
    }

    /// Makes lookups of an article fail with the given error.
    pub fn with_failure(mut self, article_id: impl Into<ArticleId>, error: CatalogError) -> Self {
        self.data_mut()
            .responses
            .insert(article_id.into(), Err(error));
        self
    }

    /// Delays the answer for an article.
    pub fn with_delay(mut self, article_id: impl Into<ArticleId>, delay: Duration) -> Self {
        self.data_mut().delays.insert(article_id.into(), delay);
        self
    }

    /// Rejects lookups made with any other token with a 401 status.
    pub fn with_required_token(mut self, token: impl Into<String>) -> Self {
        self.data_mut().required_token = Some(token.into());
        self
    }

    /// Returns the number of lookups served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn data_mut(&mut self) -> &mut CatalogData {
        Arc::make_mut(&mut self.data)
    }
}

#[async_trait]
impl ArticleCatalog for InMemoryArticleCatalog {
    async fn lookup_article(
        &self,
        article_id: &ArticleId,
        auth_token: &str,
    ) -> Result<ArticleSnapshot, CatalogError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.data.delays.get(article_id) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(required) = &self.data.required_token
            && required != auth_token
        {
            return Err(CatalogError::Status { status: 401 });
        }

        match self.data.responses.get(article_id) {
            Some(response) => response.clone(),
            None => Err(CatalogError::NotFound {
                article_id: article_id.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_article() {
        let catalog =
            InMemoryArticleCatalog::new().with_article(ArticleSnapshot::new("A", true, 3));

        let snapshot = catalog.lookup_article(&"A".into(), "token").await.unwrap();

        assert_eq!(snapshot, ArticleSnapshot::new("A", true, 3));
        assert_eq!(catalog.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_article_is_not_found() {
        let catalog = InMemoryArticleCatalog::new();
        let result = catalog.lookup_article(&"X".into(), "token").await;
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_configured_failure() {
        let catalog = InMemoryArticleCatalog::new().with_failure("B", CatalogError::Timeout);
        let result = catalog.lookup_article(&"B".into(), "token").await;
        assert_eq!(result, Err(CatalogError::Timeout));
    }

    #[tokio::test]
    async fn test_required_token() {
        let catalog = InMemoryArticleCatalog::new()
            .with_article(ArticleSnapshot::new("A", true, 3))
            .with_required_token("secret");

        assert!(catalog.lookup_article(&"A".into(), "secret").await.is_ok());
        assert_eq!(
            catalog.lookup_article(&"A".into(), "other").await,
            Err(CatalogError::Status { status: 401 })
        );
    }

    #[tokio::test]
    async fn test_clones_share_lookup_count() {
        let catalog = InMemoryArticleCatalog::new();
        let clone = catalog.clone();

        let _ = clone.lookup_article(&"A".into(), "token").await;

        assert_eq!(catalog.lookup_count(), 1);
    }
}
