//! Article catalog collaborator.
//!
//! The catalog service is the source of truth for whether an article exists,
//! is enabled, and how much stock it has. This crate provides the
//! `ArticleCatalog` trait plus an HTTP client and an in-memory double.

pub mod article;
pub mod client;
pub mod error;
pub mod http;
pub mod memory;

pub use article::ArticleSnapshot;
pub use client::ArticleCatalog;
pub use common::ArticleId;
pub use error::CatalogError;
pub use http::{CatalogConfig, HttpArticleCatalog};
pub use memory::InMemoryArticleCatalog;
