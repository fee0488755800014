//! Classification stage.
//!
//! Pure functions: no I/O, no failure modes.

use std::collections::HashMap;

use cart::LineItem;
use catalog::ArticleSnapshot;
use common::ArticleId;

use crate::fanout::LookupOutcome;
use crate::report::{
    INSUFFICIENT_STOCK, INVALID_ARTICLE, LineValidationOutcome, NOT_FOUND, ValidationIssue,
    ValidationReport,
};

/// Classifies a single line against its catalog snapshot.
///
/// Checks run in order: missing snapshot, disabled article, short stock.
pub fn classify_line(
    line: &LineItem,
    snapshot: Option<&ArticleSnapshot>,
) -> LineValidationOutcome {
    let issue = |message: &str| ValidationIssue::new(line.article_id.clone(), message);

    match snapshot {
        None => LineValidationOutcome::Error(issue(NOT_FOUND)),
        Some(article) if !article.enabled => LineValidationOutcome::Error(issue(INVALID_ARTICLE)),
        Some(article) if article.stock < line.quantity => {
            LineValidationOutcome::Warning(issue(INSUFFICIENT_STOCK))
        }
        Some(_) => LineValidationOutcome::Ok,
    }
}

/// Joins lookup outcomes back to the cart lines and builds the report.
///
/// Snapshots are matched to lines by article ID. If several snapshots share
/// an ID the first one in `outcomes` wins. Report order follows `lines`.
pub fn classify(lines: &[LineItem], outcomes: &[LookupOutcome]) -> ValidationReport {
    let mut snapshots: HashMap<&ArticleId, &ArticleSnapshot> = HashMap::new();
    for snapshot in outcomes.iter().filter_map(LookupOutcome::snapshot) {
        snapshots.entry(&snapshot.id).or_insert(snapshot);
    }

    let mut report = ValidationReport::default();
    for line in lines {
        report.record(classify_line(line, snapshots.get(&line.article_id).copied()));
    }
    report
}
