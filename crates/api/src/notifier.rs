//! Background article confirmation triggered when a cart is loaded.

use std::sync::Arc;

use cart::{Cart, LineItem};
use common::{ArticleId, UserId};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::{SharedCartService, SharedPipeline};

/// Confirms not-yet-validated cart lines against the catalog off the
/// request path.
///
/// Confirmed lines get their `validated` flag set. Every failure is logged
/// and dropped; the request that triggered the notification never sees it.
#[derive(Clone)]
pub struct ValidationNotifier {
    enabled: bool,
    pipeline: Arc<SharedPipeline>,
    carts: Arc<SharedCartService>,
}

impl ValidationNotifier {
    pub fn new(
        enabled: bool,
        pipeline: Arc<SharedPipeline>,
        carts: Arc<SharedCartService>,
    ) -> Self {
        Self {
            enabled,
            pipeline,
            carts,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Spawns confirmation of the cart's pending lines.
    ///
    /// Returns `None` when disabled or when every line is already validated.
    pub fn notify(&self, cart: &Cart, auth_token: &str) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }

        let pending: Vec<LineItem> = cart
            .lines()
            .iter()
            .filter(|line| !line.validated)
            .cloned()
            .collect();
        if pending.is_empty() {
            return None;
        }

        let span = tracing::info_span!(
            "background_validation",
            cart_id = %cart.id(),
            lines = pending.len()
        );
        let pipeline = self.pipeline.clone();
        let carts = self.carts.clone();
        let user_id = cart.user_id().clone();
        let token = auth_token.to_string();

        Some(tokio::spawn(
            async move { confirm_lines(&pipeline, &carts, &user_id, &pending, &token).await }
                .instrument(span),
        ))
    }
}

async fn confirm_lines(
    pipeline: &SharedPipeline,
    carts: &SharedCartService,
    user_id: &UserId,
    lines: &[LineItem],
    token: &str,
) {
    let outcomes = pipeline.lookup(lines, token).await;
    let confirmed: Vec<ArticleId> = outcomes
        .into_iter()
        .filter(|outcome| {
            outcome
                .snapshot()
                .is_some_and(|snapshot| snapshot.enabled && snapshot.id == outcome.article_id)
        })
        .map(|outcome| outcome.article_id)
        .collect();

    if confirmed.is_empty() {
        return;
    }

    match carts.mark_validated(user_id, &confirmed).await {
        Ok(changed) => tracing::debug!(changed, "cart lines confirmed"),
        Err(err) => tracing::warn!(error = %err, "failed to record confirmed cart lines"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart::{CartService, CartStore, InMemoryCartStore};
    use catalog::{ArticleCatalog, ArticleSnapshot, CatalogError, InMemoryArticleCatalog};
    use validation::ValidationPipeline;

    fn notifier(enabled: bool, catalog: InMemoryArticleCatalog) -> ValidationNotifier {
        let store: Arc<dyn CartStore> = Arc::new(InMemoryCartStore::new());
        let catalog: Arc<dyn ArticleCatalog> = Arc::new(catalog);
        ValidationNotifier::new(
            enabled,
            Arc::new(ValidationPipeline::new(catalog)),
            Arc::new(CartService::new(store)),
        )
    }

    #[tokio::test]
    async fn test_confirms_enabled_articles() {
        let catalog = InMemoryArticleCatalog::new()
            .with_article(ArticleSnapshot::new("A", true, 1))
            .with_article(ArticleSnapshot::new("B", false, 1))
            .with_failure("C", CatalogError::Timeout);
        let notifier = notifier(true, catalog);
        let user = UserId::new("user-1");
        for id in ["A", "B", "C"] {
            notifier.carts.add_article(&user, id.into(), 1).await.unwrap();
        }
        let cart = notifier.carts.current_cart(&user).await.unwrap();

        notifier.notify(&cart, "token").unwrap().await.unwrap();

        let cart = notifier.carts.current_cart(&user).await.unwrap();
        let flags: Vec<bool> = cart.lines().iter().map(|line| line.validated).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[tokio::test]
    async fn test_disabled_notifier_does_nothing() {
        let notifier = notifier(false, InMemoryArticleCatalog::new());
        let user = UserId::new("user-1");
        let cart = notifier.carts.add_article(&user, "A".into(), 1).await.unwrap();

        assert!(notifier.notify(&cart, "token").is_none());
    }

    #[tokio::test]
    async fn test_skips_when_all_lines_validated() {
        let catalog =
            InMemoryArticleCatalog::new().with_article(ArticleSnapshot::new("A", true, 1));
        let notifier = notifier(true, catalog);
        let user = UserId::new("user-1");
        let cart = notifier.carts.add_article(&user, "A".into(), 1).await.unwrap();
        notifier.notify(&cart, "token").unwrap().await.unwrap();

        let cart = notifier.carts.current_cart(&user).await.unwrap();

        assert!(notifier.notify(&cart, "token").is_none());
    }
}
