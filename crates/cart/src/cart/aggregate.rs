//! Cart aggregate implementation.

use chrono::{DateTime, Utc};
use common::{ArticleId, CartId, OrderId, UserId};
use serde::{Deserialize, Serialize};

use super::{CartError, CartRevision, CartState, LineItem};

/// Cart aggregate root.
///
/// Holds the ordered line items a user intends to buy. Line order is the
/// order in which articles were first added and is kept stable across
/// quantity changes.
///
/// `version` is the store revision the cart was loaded at. Zero means the
/// cart has never been saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    #[serde(default)]
    version: u64,
    user_id: UserId,
    state: CartState,
    order_id: Option<OrderId>,
    lines: Vec<LineItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

// Query methods
impl Cart {
    /// Creates a new, empty, active cart for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::new(),
            version: 0,
            user_id,
            state: CartState::Active,
            order_id: None,
            lines: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> CartId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the identity and version this copy of the cart was loaded at.
    pub fn revision(&self) -> CartRevision {
        CartRevision {
            cart_id: self.id,
            version: self.version,
        }
    }

    /// Returns the cart as stored at `version`.
    ///
    /// Called by store implementations after a successful save.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn state(&self) -> CartState {
        self.state
    }

    /// Returns the order created at checkout, if any.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    /// Returns the line items in cart order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Returns the line for an article.
    pub fn line(&self, article_id: &ArticleId) -> Option<&LineItem> {
        self.lines.iter().find(|line| &line.article_id == article_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn is_active(&self) -> bool {
        self.state == CartState::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

// Command methods
impl Cart {
    /// Adds an article to the cart.
    ///
    /// If the article is already present its quantity is increased instead.
    pub fn add_article(&mut self, article_id: ArticleId, quantity: u32) -> Result<(), CartError> {
        self.ensure_modifiable("add article")?;

        if article_id.is_blank() {
            return Err(CartError::EmptyArticleId);
        }
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        match self.line_mut(&article_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(LineItem::new(article_id, quantity)),
        }
        self.touch();
        Ok(())
    }

    /// Increases the quantity of an existing line by one.
    pub fn increment(&mut self, article_id: &ArticleId) -> Result<(), CartError> {
        self.ensure_modifiable("increment article")?;

        let line = self
            .line_mut(article_id)
            .ok_or_else(|| CartError::ArticleNotFound {
                article_id: article_id.clone(),
            })?;
        line.quantity = line.quantity.saturating_add(1);
        self.touch();
        Ok(())
    }

    /// Decreases the quantity of an existing line by one.
    ///
    /// A line that would drop below one is removed.
    pub fn decrement(&mut self, article_id: &ArticleId) -> Result<(), CartError> {
        self.ensure_modifiable("decrement article")?;

        let line = self
            .line_mut(article_id)
            .ok_or_else(|| CartError::ArticleNotFound {
                article_id: article_id.clone(),
            })?;

        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.lines.retain(|line| &line.article_id != article_id);
        }
        self.touch();
        Ok(())
    }

    /// Removes an article from the cart.
    pub fn remove_article(&mut self, article_id: &ArticleId) -> Result<(), CartError> {
        self.ensure_modifiable("remove article")?;

        let before = self.lines.len();
        self.lines.retain(|line| &line.article_id != article_id);
        if self.lines.len() == before {
            return Err(CartError::ArticleNotFound {
                article_id: article_id.clone(),
            });
        }
        self.touch();
        Ok(())
    }

    /// Flags a line as confirmed by the catalog.
    ///
    /// Returns false when the line no longer exists or the cart is closed.
    pub fn mark_validated(&mut self, article_id: &ArticleId) -> bool {
        if !self.state.can_modify_items() {
            return false;
        }
        match self.line_mut(article_id) {
            Some(line) if !line.validated => {
                line.validated = true;
                self.touch();
                true
            }
            _ => false,
        }
    }

    /// Closes the cart and assigns the order it becomes.
    pub fn checkout(&mut self) -> Result<OrderId, CartError> {
        if !self.state.can_checkout() {
            return Err(CartError::NotActive {
                state: self.state,
                action: "checkout",
            });
        }
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let order_id = OrderId::new();
        self.order_id = Some(order_id);
        self.state = CartState::CheckedOut;
        self.touch();
        Ok(order_id)
    }

    fn ensure_modifiable(&self, action: &'static str) -> Result<(), CartError> {
        if self.state.can_modify_items() {
            Ok(())
        } else {
            Err(CartError::NotActive {
                state: self.state,
                action,
            })
        }
    }

    fn line_mut(&mut self, article_id: &ArticleId) -> Option<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| &line.article_id == article_id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        Cart::new(UserId::new("user-1"))
    }

    #[test]
    fn test_new_cart_is_active_and_empty() {
        let cart = cart();
        assert!(cart.is_active());
        assert!(cart.is_empty());
        assert_eq!(cart.order_id(), None);
        assert_eq!(cart.user_id().as_str(), "user-1");
        assert_eq!(cart.version(), 0);
    }

    #[test]
    fn test_revision_tracks_version() {
        let cart = cart().with_version(3);
        let revision = cart.revision();
        assert_eq!(revision.cart_id, cart.id());
        assert_eq!(revision.version, 3);
    }

    #[test]
    fn test_add_merges_existing_article() {
        let mut cart = cart();
        cart.add_article("A".into(), 2).unwrap();
        cart.add_article("B".into(), 1).unwrap();
        cart.add_article("A".into(), 3).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(&"A".into()).unwrap().quantity, 5);
        assert_eq!(cart.lines()[0].article_id.as_str(), "A");
        assert_eq!(cart.total_quantity(), 6);
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let mut cart = cart();
        let result = cart.add_article("A".into(), 0);
        assert!(matches!(
            result,
            Err(CartError::InvalidQuantity { quantity: 0 })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_article() {
        let mut cart = cart();
        assert!(matches!(
            cart.add_article("".into(), 1),
            Err(CartError::EmptyArticleId)
        ));
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = cart();
        cart.add_article("A".into(), 1).unwrap();
        cart.increment(&"A".into()).unwrap();
        assert_eq!(cart.line(&"A".into()).unwrap().quantity, 2);

        cart.decrement(&"A".into()).unwrap();
        assert_eq!(cart.line(&"A".into()).unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_below_one_removes_line() {
        let mut cart = cart();
        cart.add_article("A".into(), 1).unwrap();
        cart.add_article("B".into(), 4).unwrap();

        cart.decrement(&"A".into()).unwrap();

        assert!(cart.line(&"A".into()).is_none());
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_increment_unknown_article_fails() {
        let mut cart = cart();
        let result = cart.increment(&"missing".into());
        assert!(matches!(result, Err(CartError::ArticleNotFound { .. })));
    }

    #[test]
    fn test_remove_article() {
        let mut cart = cart();
        cart.add_article("A".into(), 3).unwrap();
        cart.remove_article(&"A".into()).unwrap();
        assert!(cart.is_empty());

        let result = cart.remove_article(&"A".into());
        assert!(matches!(result, Err(CartError::ArticleNotFound { .. })));
    }

    #[test]
    fn test_mark_validated_only_once() {
        let mut cart = cart();
        cart.add_article("A".into(), 1).unwrap();

        assert!(cart.mark_validated(&"A".into()));
        assert!(!cart.mark_validated(&"A".into()));
        assert!(!cart.mark_validated(&"B".into()));
        assert!(cart.line(&"A".into()).unwrap().validated);
    }

    #[test]
    fn test_checkout_closes_cart() {
        let mut cart = cart();
        cart.add_article("A".into(), 1).unwrap();

        let order_id = cart.checkout().unwrap();

        assert_eq!(cart.state(), CartState::CheckedOut);
        assert_eq!(cart.order_id(), Some(order_id));
        assert!(matches!(
            cart.add_article("B".into(), 1),
            Err(CartError::NotActive { .. })
        ));
        assert!(matches!(cart.checkout(), Err(CartError::NotActive { .. })));
    }

    #[test]
    fn test_checkout_empty_cart_fails() {
        let mut cart = cart();
        assert!(matches!(cart.checkout(), Err(CartError::EmptyCart)));
        assert!(cart.is_active());
    }
}
