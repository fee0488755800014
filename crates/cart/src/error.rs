//! Cart service error types.

use common::{CartId, UserId};
use thiserror::Error;

use crate::cart::CartError;
use crate::store::StoreError;

/// Errors that can occur during cart service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A cart rule was violated.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The cart store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The user has no active cart to operate on.
    #[error("No active cart for user {0}")]
    NoActiveCart(UserId),

    /// The cart was modified or replaced after the caller last read it.
    #[error("Cart {cart_id} changed since it was validated")]
    CartChanged { cart_id: CartId },
}
