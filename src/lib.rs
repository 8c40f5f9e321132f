//! # llamamd
//!
//! Batch-convert folders of PDF documents to Markdown using the LlamaParse
//! cloud parsing API.
//!
//! ## Why this crate?
//!
//! Local PDF extraction tools struggle with scanned pages, CJK text, and
//! complex layouts. LlamaParse handles all of that server-side and returns
//! clean, page-segmented Markdown. What it does *not* do is batch work:
//! this crate walks a folder, submits each PDF, stitches the per-page
//! output back into one Markdown file per source document, and writes the
//! results to disk.
//!
//! ## Pipeline Overview
//!
//! ```text
//! folder of PDFs
//!  │
//!  ├─ 1. Scan    enumerate *.pdf entries (case-insensitive)
//!  ├─ 2. Parse   upload each file to LlamaParse, poll the job,
//!  │             fetch the page-segmented result (sequential, one
//!  │             call per file — concurrency is the service's job)
//!  ├─ 3. Merge   join pages; drop the leading paragraph of every
//!  │             page after the first (repeated-header heuristic)
//!  └─ 4. Write   <output>/<stem>.md, UTF-8, one file per PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llamamd::{convert_folder, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from LLAMA_CLOUD_API_KEY if not set explicitly
//!     let config = BatchConfig::default();
//!     let output = convert_folder("data", "pdf2markdown", &config).await?;
//!     eprintln!(
//!         "{}/{} files converted ({} pages)",
//!         output.stats.converted_files,
//!         output.stats.total_files,
//!         output.stats.total_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `llamamd` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! llamamd = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::LlamaParseClient;
pub use config::{BatchConfig, BatchConfigBuilder, HeaderStrip, ResultFormat};
pub use convert::{convert_file, convert_folder, load_folder, parse_folder};
pub use error::{BatchError, FileError};
pub use output::{BatchOutput, BatchStats, Document, DocumentSet, FileResult};
pub use parser::DocumentParser;
pub use progress::{BatchProgressCallback, ProgressCallback};
