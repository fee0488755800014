//! Cart aggregate and related types.

mod aggregate;
mod line_item;
mod service;
mod state;

pub use aggregate::Cart;
pub use line_item::LineItem;
pub use service::CartService;
pub use state::CartState;

use common::{ArticleId, CartId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A cart identity pinned to the version it was read at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRevision {
    pub cart_id: CartId,
    pub version: u64,
}

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Article ID must not be blank.
    #[error("Article ID is required")]
    EmptyArticleId,

    /// The article is not part of the cart.
    #[error("Article not found in cart: {article_id}")]
    ArticleNotFound { article_id: ArticleId },

    /// The cart has already been checked out.
    #[error("Cart is not active: cannot {action} in {state} state")]
    NotActive {
        state: CartState,
        action: &'static str,
    },

    /// Checkout requires at least one line.
    #[error("Cart has no articles")]
    EmptyCart,
}
