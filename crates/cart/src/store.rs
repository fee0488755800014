//! Cart storage abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use common::{CartId, UserId};
use thiserror::Error;

use crate::cart::Cart;

/// Errors raised by a cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The user already owns a different active cart.
    #[error("User {user_id} already has an active cart {existing}")]
    DuplicateActiveCart { user_id: UserId, existing: CartId },

    /// The cart was saved by someone else since it was loaded.
    #[error("Version conflict for cart {cart_id}: expected version {expected}, found {actual}")]
    VersionConflict {
        cart_id: CartId,
        expected: u64,
        actual: u64,
    },

    /// The backing storage could not be reached.
    #[error("Cart storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for carts.
///
/// Implementations must keep at most one active cart per user and must
/// reject saves of a stale copy.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Returns the active cart for a user, if one exists.
    async fn find_active(&self, user_id: &UserId) -> Result<Option<Cart>, StoreError>;

    /// Returns a cart by ID regardless of its state.
    async fn get(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError>;

    /// Inserts or replaces a cart.
    ///
    /// `cart.version()` must match the stored version (zero for a new cart).
    /// Returns the cart at its new version.
    async fn save(&self, cart: &Cart) -> Result<Cart, StoreError>;
}

#[async_trait]
impl<T: CartStore + ?Sized> CartStore for Arc<T> {
    async fn find_active(&self, user_id: &UserId) -> Result<Option<Cart>, StoreError> {
        (**self).find_active(user_id).await
    }

    async fn get(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        (**self).get(cart_id).await
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, StoreError> {
        (**self).save(cart).await
    }
}
