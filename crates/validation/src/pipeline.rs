//! Validation pipeline wiring the fan-out and classification stages.

use cart::LineItem;
use catalog::ArticleCatalog;

use crate::classify::classify;
use crate::fanout::{LookupOutcome, lookup_all};
use crate::report::ValidationReport;

/// Validates cart lines against an article catalog.
///
/// The catalog client is passed in explicitly so tests can swap in a double.
/// Each call fetches every article fresh. Nothing is cached between calls.
pub struct ValidationPipeline<C: ArticleCatalog> {
    catalog: C,
}

impl<C: ArticleCatalog> ValidationPipeline<C> {
    /// Creates a pipeline backed by the given catalog.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Returns a reference to the catalog client.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Runs the full pipeline and returns the report.
    ///
    /// Never fails: lookup failures show up as "not found" errors on the
    /// affected lines.
    #[tracing::instrument(skip_all, fields(lines = lines.len()))]
    pub async fn validate(&self, lines: &[LineItem], auth_token: &str) -> ValidationReport {
        metrics::counter!("cart_validations_total").increment(1);
        let start = std::time::Instant::now();

        let outcomes = self.lookup(lines, auth_token).await;
        let report = classify(lines, &outcomes);

        metrics::histogram!("cart_validation_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "cart validated"
        );
        report
    }

    /// Runs only the fan-out stage.
    pub async fn lookup(&self, lines: &[LineItem], auth_token: &str) -> Vec<LookupOutcome> {
        lookup_all(&self.catalog, lines, auth_token).await
    }
}
