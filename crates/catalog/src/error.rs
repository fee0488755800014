//! Catalog error types.

use common::ArticleId;
use thiserror::Error;

/// Errors that can occur while looking up an article.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog does not know the article.
    #[error("Article not found: {article_id}")]
    NotFound { article_id: ArticleId },

    /// The request did not complete within the configured timeout.
    #[error("Catalog request timed out")]
    Timeout,

    /// The catalog answered with a non-success status.
    #[error("Catalog responded with status {status}")]
    Status { status: u16 },

    /// The request failed before a response arrived.
    #[error("Catalog transport error: {0}")]
    Transport(String),

    /// The response body was not a valid article.
    #[error("Malformed catalog response: {0}")]
    Malformed(String),

    /// The catalog client could not be built from its configuration.
    #[error("Invalid catalog configuration: {0}")]
    Config(String),
}

impl CatalogError {
    /// Short label for the failure cause, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Timeout => "timeout",
            CatalogError::Status { .. } => "status",
            CatalogError::Transport(_) => "transport",
            CatalogError::Malformed(_) => "malformed",
            CatalogError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Malformed(err.to_string())
        } else if err.is_builder() {
            CatalogError::Config(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        let not_found = CatalogError::NotFound {
            article_id: ArticleId::new("A"),
        };
        assert_eq!(not_found.kind(), "not_found");
        assert_eq!(CatalogError::Timeout.kind(), "timeout");
        assert_eq!(CatalogError::Status { status: 500 }.kind(), "status");
        assert_eq!(CatalogError::Malformed(String::new()).kind(), "malformed");
    }
}
