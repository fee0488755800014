//! Catalog article snapshot.

use common::ArticleId;
use serde::{Deserialize, Serialize};

/// The subset of catalog article data needed to validate a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSnapshot {
    /// Catalog identifier. The catalog service sends it as `_id`.
    #[serde(alias = "_id")]
    pub id: ArticleId,

    /// Whether the article can currently be sold.
    pub enabled: bool,

    /// Units in stock.
    pub stock: u32,
}

impl ArticleSnapshot {
    /// Creates a new snapshot.
    pub fn new(id: impl Into<ArticleId>, enabled: bool, stock: u32) -> Self {
        Self {
            id: id.into(),
            enabled,
            stock,
        }
    }
}
