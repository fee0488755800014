//! Fan-out lookup stage.

use cart::LineItem;
use catalog::{ArticleCatalog, ArticleSnapshot, CatalogError};
use common::ArticleId;
use futures_util::future::join_all;

/// Result of looking up one cart line in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    /// The article ID that was requested.
    pub article_id: ArticleId,
    /// The snapshot, or why it could not be obtained.
    pub result: Result<ArticleSnapshot, CatalogError>,
}

impl LookupOutcome {
    pub fn found(article_id: impl Into<ArticleId>, snapshot: ArticleSnapshot) -> Self {
        Self {
            article_id: article_id.into(),
            result: Ok(snapshot),
        }
    }

    pub fn failed(article_id: impl Into<ArticleId>, error: CatalogError) -> Self {
        Self {
            article_id: article_id.into(),
            result: Err(error),
        }
    }

    /// Returns the snapshot if the lookup succeeded.
    pub fn snapshot(&self) -> Option<&ArticleSnapshot> {
        self.result.as_ref().ok()
    }

    /// Returns the failure cause if the lookup failed.
    pub fn failure(&self) -> Option<&CatalogError> {
        self.result.as_ref().err()
    }
}

/// Looks up every line concurrently and waits for all lookups to settle.
///
/// Returns one outcome per line, in line order. Duplicate article IDs are
/// looked up once per line. Failures are logged and kept in the outcome.
pub async fn lookup_all<C>(
    catalog: &C,
    lines: &[LineItem],
    auth_token: &str,
) -> Vec<LookupOutcome>
where
    C: ArticleCatalog + ?Sized,
{
    let lookups = lines.iter().map(|line| async move {
        let result = catalog.lookup_article(&line.article_id, auth_token).await;

        if let Err(err) = &result {
            tracing::warn!(
                article_id = %line.article_id,
                kind = err.kind(),
                error = %err,
                "article lookup failed"
            );
            metrics::counter!("catalog_lookup_failures_total", "kind" => err.kind()).increment(1);
        }

        LookupOutcome {
            article_id: line.article_id.clone(),
            result,
        }
    });

    join_all(lookups).await
}
