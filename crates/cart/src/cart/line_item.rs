//! Cart line items.

use common::ArticleId;
use serde::{Deserialize, Serialize};

/// One article and the quantity requested of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// The catalog article.
    pub article_id: ArticleId,

    /// Quantity requested, always at least one.
    pub quantity: u32,

    /// Set once the catalog confirmed the article exists and is enabled.
    #[serde(default)]
    pub validated: bool,
}

impl LineItem {
    /// Creates a new, not yet validated line item.
    pub fn new(article_id: impl Into<ArticleId>, quantity: u32) -> Self {
        Self {
            article_id: article_id.into(),
            quantity,
            validated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_is_not_validated() {
        let line = LineItem::new("ART-001", 2);
        assert_eq!(line.article_id.as_str(), "ART-001");
        assert_eq!(line.quantity, 2);
        assert!(!line.validated);
    }

    #[test]
    fn test_serializes_camel_case() {
        let line = LineItem::new("ART-001", 3);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["articleId"], "ART-001");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["validated"], false);
    }
}
