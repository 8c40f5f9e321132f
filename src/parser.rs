//! The parsing seam: anything that turns a PDF on disk into pages.
//!
//! Production code uses [`crate::client::LlamaParseClient`]; tests inject
//! a mock through [`crate::config::BatchConfig::parser`] so the pipeline
//! runs without network access.

use crate::error::FileError;
use crate::output::Document;
use async_trait::async_trait;
use std::path::Path;

/// Converts one PDF file into an ordered sequence of per-page documents.
///
/// Implementations must be `Send + Sync`; the batch driver holds them in
/// an `Arc` for the lifetime of a run. The returned vector's order is the
/// page order and must match the source document.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse the PDF at `path` into per-page documents.
    async fn parse(&self, path: &Path) -> Result<Vec<Document>, FileError>;
}
