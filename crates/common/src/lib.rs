//! Identifier types shared across the cart service crates.

pub mod types;

pub use types::{ArticleId, CartId, OrderId, UserId};
