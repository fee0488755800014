//! Cart domain for the cart service.
//!
//! This crate provides:
//! - The `Cart` aggregate with its line items and lifecycle state
//! - The `CartStore` trait and an in-memory implementation
//! - `CartService`, which loads, mutates, and saves carts per user

pub mod cart;
pub mod error;
pub mod memory;
pub mod store;

pub use cart::{Cart, CartError, CartRevision, CartService, CartState, LineItem};
pub use common::{ArticleId, CartId, OrderId, UserId};
pub use error::ServiceError;
pub use memory::InMemoryCartStore;
pub use store::{CartStore, StoreError};
