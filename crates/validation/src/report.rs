//! Validation report types.

use common::ArticleId;
use serde::{Deserialize, Serialize};

/// Message for a line whose article could not be found.
pub const NOT_FOUND: &str = "No se encuentra";

/// Message for a line whose article is disabled.
pub const INVALID_ARTICLE: &str = "Articulo inválido";

/// Message for a line asking for more units than are in stock.
pub const INSUFFICIENT_STOCK: &str = "Insuficiente stock";

/// A single problem found on a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub article_id: ArticleId,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(article_id: ArticleId, message: impl Into<String>) -> Self {
        Self {
            article_id,
            message: message.into(),
        }
    }
}

/// Verdict for one cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineValidationOutcome {
    /// The line cannot be purchased.
    Error(ValidationIssue),
    /// The line can be purchased but is flagged.
    Warning(ValidationIssue),
    /// Nothing to report.
    Ok,
}

/// Errors and warnings for a cart, in cart line order.
///
/// Built fresh for every validation and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Appends a line verdict to the matching list.
    pub fn record(&mut self, outcome: LineValidationOutcome) {
        match outcome {
            LineValidationOutcome::Error(issue) => self.errors.push(issue),
            LineValidationOutcome::Warning(issue) => self.warnings.push(issue),
            LineValidationOutcome::Ok => {}
        }
    }

    /// Returns true when no line has an error. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns true when neither errors nor warnings were found.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
