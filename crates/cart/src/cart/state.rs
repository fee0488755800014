//! Cart lifecycle state.

use serde::{Deserialize, Serialize};

/// The state of a cart.
///
/// ```text
/// Active ──checkout──► CheckedOut
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CartState {
    /// Cart accepts line item changes.
    #[default]
    Active,

    /// Cart was turned into an order (terminal state).
    CheckedOut,
}

impl CartState {
    /// Returns true if line items can be modified in this state.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, CartState::Active)
    }

    /// Returns true if the cart can be checked out in this state.
    pub fn can_checkout(&self) -> bool {
        matches!(self, CartState::Active)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartState::Active => "Active",
            CartState::CheckedOut => "CheckedOut",
        }
    }
}

impl std::fmt::Display for CartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
