use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{CartId, UserId};
use tokio::sync::RwLock;

use crate::cart::Cart;
use crate::store::{CartStore, StoreError};

/// In-memory cart store.
///
/// Stands in for the document database in tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<CartId, Cart>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of carts stored, active or not.
    pub async fn cart_count(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_active(&self, user_id: &UserId) -> Result<Option<Cart>, StoreError> {
        let carts = self.carts.read().await;
        Ok(carts
            .values()
            .find(|cart| cart.is_active() && cart.user_id() == user_id)
            .cloned())
    }

    async fn get(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        Ok(self.carts.read().await.get(&cart_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, StoreError> {
        let mut carts = self.carts.write().await;

        let current_version = carts.get(&cart.id()).map_or(0, Cart::version);
        if current_version != cart.version() {
            return Err(StoreError::VersionConflict {
                cart_id: cart.id(),
                expected: cart.version(),
                actual: current_version,
            });
        }

        if cart.is_active()
            && let Some(existing) = carts.values().find(|other| {
                other.is_active() && other.user_id() == cart.user_id() && other.id() != cart.id()
            })
        {
            return Err(StoreError::DuplicateActiveCart {
                user_id: cart.user_id().clone(),
                existing: existing.id(),
            });
        }

        let saved = cart.clone().with_version(current_version + 1);
        carts.insert(saved.id(), saved.clone());
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find_active() {
        let store = InMemoryCartStore::new();
        let user = UserId::new("user-1");
        let cart = Cart::new(user.clone());

        store.save(&cart).await.unwrap();

        let found = store.find_active(&user).await.unwrap().unwrap();
        assert_eq!(found.id(), cart.id());
        assert_eq!(store.cart_count().await, 1);
    }

    #[tokio::test]
    async fn test_checked_out_cart_is_not_active() {
        let store = InMemoryCartStore::new();
        let user = UserId::new("user-1");
        let mut cart = Cart::new(user.clone());
        cart.add_article("A".into(), 1).unwrap();
        cart.checkout().unwrap();

        store.save(&cart).await.unwrap();

        assert!(store.find_active(&user).await.unwrap().is_none());
        assert!(store.get(cart.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_rejects_second_active_cart() {
        let store = InMemoryCartStore::new();
        let user = UserId::new("user-1");

        store.save(&Cart::new(user.clone())).await.unwrap();
        let result = store.save(&Cart::new(user)).await;

        assert!(matches!(
            result,
            Err(StoreError::DuplicateActiveCart { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_bumps_version() {
        let store = InMemoryCartStore::new();
        let cart = Cart::new(UserId::new("user-1"));

        let saved = store.save(&cart).await.unwrap();
        assert_eq!(saved.version(), 1);

        let saved = store.save(&saved).await.unwrap();
        assert_eq!(saved.version(), 2);
        assert_eq!(store.get(cart.id()).await.unwrap().unwrap().version(), 2);
    }

    #[tokio::test]
    async fn test_rejects_stale_copy() {
        let store = InMemoryCartStore::new();
        let saved = store.save(&Cart::new(UserId::new("user-1"))).await.unwrap();

        let mut first = saved.clone();
        let mut second = saved;
        first.add_article("A".into(), 1).unwrap();
        second.add_article("B".into(), 1).unwrap();
        store.save(&first).await.unwrap();
        let result = store.save(&second).await;

        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        let stored = store.get(first.id()).await.unwrap().unwrap();
        assert!(stored.line(&"A".into()).is_some());
        assert!(stored.line(&"B".into()).is_none());
    }
}
