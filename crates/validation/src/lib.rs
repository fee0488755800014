//! Cart validation pipeline.
//!
//! Checks every line of a cart against the article catalog before checkout:
//! 1. Fan-out: one concurrent catalog lookup per line, failures kept per line
//! 2. Classification: each line becomes an error, a warning, or nothing
//!
//! A lookup failure never fails the pipeline. The affected line is reported
//! as not found and the remaining lines are classified as usual.

pub mod classify;
pub mod fanout;
pub mod pipeline;
pub mod report;

pub use classify::{classify, classify_line};
pub use fanout::{LookupOutcome, lookup_all};
pub use pipeline::ValidationPipeline;
pub use report::{
    INSUFFICIENT_STOCK, INVALID_ARTICLE, LineValidationOutcome, NOT_FOUND, ValidationIssue,
    ValidationReport,
};
