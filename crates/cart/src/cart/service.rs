//! Cart service providing per-user cart operations.

use common::{ArticleId, OrderId, UserId};

use crate::error::ServiceError;
use crate::store::{CartStore, StoreError};

use super::{Cart, CartError, CartRevision};

/// How many times a command is replayed on a fresh copy after losing a
/// version race.
const MAX_SAVE_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy)]
enum Load {
    Existing,
    OrCreate,
}

/// Service for managing the active cart of each user.
///
/// Every mutation follows load → mutate → save against the store. A save
/// that loses a version race is replayed on a freshly loaded cart, so
/// overlapping commands for the same user never drop each other's changes.
pub struct CartService<S: CartStore> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    /// Creates a new cart service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the user's active cart, creating an empty one on first access.
    #[tracing::instrument(skip(self))]
    pub async fn current_cart(&self, user_id: &UserId) -> Result<Cart, ServiceError> {
        if let Some(cart) = self.store.find_active(user_id).await? {
            return Ok(cart);
        }

        match self.store.save(&Cart::new(user_id.clone())).await {
            Ok(cart) => {
                metrics::counter!("carts_created_total").increment(1);
                tracing::info!(cart_id = %cart.id(), "created cart");
                Ok(cart)
            }
            // Another request created the cart first
            Err(StoreError::DuplicateActiveCart { .. }) => self.active_cart(user_id).await,
            Err(err) => Err(err.into()),
        }
    }

    /// Adds an article to the user's cart, merging quantities.
    #[tracing::instrument(skip(self))]
    pub async fn add_article(
        &self,
        user_id: &UserId,
        article_id: ArticleId,
        quantity: u32,
    ) -> Result<Cart, ServiceError> {
        self.update(user_id, Load::OrCreate, |cart| {
            cart.add_article(article_id.clone(), quantity).map(|()| true)
        })
        .await
    }

    /// Increments an article's quantity by one.
    #[tracing::instrument(skip(self))]
    pub async fn increment(
        &self,
        user_id: &UserId,
        article_id: &ArticleId,
    ) -> Result<Cart, ServiceError> {
        self.update(user_id, Load::Existing, |cart| {
            cart.increment(article_id).map(|()| true)
        })
        .await
    }

    /// Decrements an article's quantity by one, dropping the line at zero.
    #[tracing::instrument(skip(self))]
    pub async fn decrement(
        &self,
        user_id: &UserId,
        article_id: &ArticleId,
    ) -> Result<Cart, ServiceError> {
        self.update(user_id, Load::Existing, |cart| {
            cart.decrement(article_id).map(|()| true)
        })
        .await
    }

    /// Removes an article from the user's cart.
    #[tracing::instrument(skip(self))]
    pub async fn remove_article(
        &self,
        user_id: &UserId,
        article_id: &ArticleId,
    ) -> Result<Cart, ServiceError> {
        self.update(user_id, Load::Existing, |cart| {
            cart.remove_article(article_id).map(|()| true)
        })
        .await
    }

    /// Flags the given articles as confirmed by the catalog.
    ///
    /// Articles no longer in the cart are skipped. Returns how many lines
    /// changed.
    #[tracing::instrument(skip(self, article_ids))]
    pub async fn mark_validated(
        &self,
        user_id: &UserId,
        article_ids: &[ArticleId],
    ) -> Result<usize, ServiceError> {
        let mut changed = 0;
        let result = self
            .update(user_id, Load::Existing, |cart| {
                changed = article_ids
                    .iter()
                    .filter(|article_id| cart.mark_validated(article_id))
                    .count();
                Ok(changed > 0)
            })
            .await;

        match result {
            Ok(_) => Ok(changed),
            Err(ServiceError::NoActiveCart(_)) => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// Checks out the user's active cart.
    ///
    /// `expected` pins the copy of the cart the caller judged fit for
    /// purchase. If the cart was modified or replaced since, nothing is
    /// closed and `ServiceError::CartChanged` is returned.
    #[tracing::instrument(skip(self))]
    pub async fn checkout(
        &self,
        user_id: &UserId,
        expected: CartRevision,
    ) -> Result<OrderId, ServiceError> {
        let mut cart = self.active_cart(user_id).await?;
        if cart.revision() != expected {
            return Err(ServiceError::CartChanged {
                cart_id: expected.cart_id,
            });
        }

        let order_id = cart.checkout()?;
        match self.store.save(&cart).await {
            Ok(_) => {}
            Err(StoreError::VersionConflict { cart_id, .. }) => {
                return Err(ServiceError::CartChanged { cart_id });
            }
            Err(err) => return Err(err.into()),
        }

        metrics::counter!("cart_checkouts_total").increment(1);
        tracing::info!(cart_id = %cart.id(), %order_id, "cart checked out");
        Ok(order_id)
    }

    async fn active_cart(&self, user_id: &UserId) -> Result<Cart, ServiceError> {
        self.store
            .find_active(user_id)
            .await?
            .ok_or_else(|| ServiceError::NoActiveCart(user_id.clone()))
    }

    /// Loads the cart, applies `apply` and saves the result.
    ///
    /// `apply` returns whether it changed anything; unchanged carts are not
    /// saved. On a version conflict the whole cycle runs again.
    async fn update<F>(
        &self,
        user_id: &UserId,
        load: Load,
        mut apply: F,
    ) -> Result<Cart, ServiceError>
    where
        F: FnMut(&mut Cart) -> Result<bool, CartError>,
    {
        let mut attempt = 1;
        loop {
            let mut cart = match load {
                Load::Existing => self.active_cart(user_id).await?,
                Load::OrCreate => self.current_cart(user_id).await?,
            };
            if !apply(&mut cart)? {
                return Ok(cart);
            }

            match self.store.save(&cart).await {
                Ok(saved) => return Ok(saved),
                Err(StoreError::VersionConflict { .. }) if attempt < MAX_SAVE_ATTEMPTS => {
                    metrics::counter!("cart_save_conflicts_total").increment(1);
                    tracing::debug!(
                        attempt,
                        cart_id = %cart.id(),
                        "cart saved concurrently, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
