//! Catalog collaborator trait.

use std::sync::Arc;

use async_trait::async_trait;
use common::ArticleId;

use crate::article::ArticleSnapshot;
use crate::error::CatalogError;

/// Looks up articles in the catalog service.
#[async_trait]
pub trait ArticleCatalog: Send + Sync {
    /// Fetches the current snapshot of an article on behalf of a user.
    async fn lookup_article(
        &self,
        article_id: &ArticleId,
        auth_token: &str,
    ) -> Result<ArticleSnapshot, CatalogError>;
}

#[async_trait]
impl<T: ArticleCatalog + ?Sized> ArticleCatalog for Arc<T> {
    async fn lookup_article(
        &self,
        article_id: &ArticleId,
        auth_token: &str,
    ) -> Result<ArticleSnapshot, CatalogError> {
        (**self).lookup_article(article_id, auth_token).await
    }
}
