//! Result types produced by a batch run.
//!
//! The names follow the shape of the data: a [`Document`] is one page of
//! parsed text, a [`DocumentSet`] is the ordered page sequence for one
//! source PDF, a [`FileResult`] records what happened to one file, and a
//! [`BatchOutput`] wraps the whole run together with its [`BatchStats`].

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One page of parsed content, as returned by the parsing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Markdown (or plain text, depending on the configured
    /// [`crate::config::ResultFormat`]) for this page.
    pub text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The ordered page sequence for one source PDF.
///
/// Page order is the order the service returned and must be preserved —
/// the merger relies on it for correct reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    /// Filename stem of the source PDF (no directory, no extension).
    pub stem: String,
    /// Pages, in page order.
    pub pages: Vec<Document>,
}

impl DocumentSet {
    pub fn new(stem: impl Into<String>, pages: Vec<Document>) -> Self {
        Self {
            stem: stem.into(),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Outcome of processing a single PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    /// Filename stem of the source PDF.
    pub stem: String,
    /// Path of the source PDF.
    pub source: PathBuf,
    /// Path of the written Markdown file, when the full pipeline ran and
    /// the file succeeded. `None` for parse-only runs and failed files.
    pub output: Option<PathBuf>,
    /// Wall-clock time spent on this file (upload + poll + fetch).
    pub duration_ms: u64,
    /// The parsed pages, or the reason this file failed.
    pub outcome: Result<DocumentSet, FileError>,
}

impl FileResult {
    /// Number of parsed pages (0 for failed files).
    pub fn page_count(&self) -> usize {
        self.outcome.as_ref().map_or(0, DocumentSet::page_count)
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Per-file results, in scan order (sorted by path).
    pub files: Vec<FileResult>,
    /// Aggregate statistics for the run.
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Successfully parsed documents keyed by filename stem.
    ///
    /// Failed files are omitted; inspect [`BatchOutput::files`] for their
    /// errors.
    pub fn documents(&self) -> BTreeMap<&str, &DocumentSet> {
        self.files
            .iter()
            .filter_map(|f| f.outcome.as_ref().ok())
            .map(|set| (set.stem.as_str(), set))
            .collect()
    }
}

/// Aggregate statistics about a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// PDFs found by the scanner.
    pub total_files: usize,
    /// Files parsed and written successfully.
    pub converted_files: usize,
    /// Files that failed with a [`FileError`].
    pub failed_files: usize,
    /// Total pages across all successful files.
    pub total_pages: usize,
    /// Wall-clock time for the whole run.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result(stem: &str, pages: usize) -> FileResult {
        FileResult {
            stem: stem.into(),
            source: PathBuf::from(format!("data/{stem}.pdf")),
            output: None,
            duration_ms: 10,
            outcome: Ok(DocumentSet::new(
                stem,
                (0..pages).map(|i| Document::new(format!("page {i}"))).collect(),
            )),
        }
    }

    #[test]
    fn documents_skips_failures_and_keys_by_stem() {
        let out = BatchOutput {
            files: vec![
                ok_result("b", 2),
                FileResult {
                    stem: "a".into(),
                    source: PathBuf::from("data/a.pdf"),
                    output: None,
                    duration_ms: 5,
                    outcome: Err(FileError::UploadFailed {
                        file: "a.pdf".into(),
                        detail: "503".into(),
                    }),
                },
                ok_result("c", 1),
            ],
            stats: BatchStats::default(),
        };

        let docs = out.documents();
        assert_eq!(docs.len(), 2);
        assert!(docs.contains_key("b"));
        assert!(docs.contains_key("c"));
        assert!(!docs.contains_key("a"));
    }

    #[test]
    fn page_count_is_zero_for_failures() {
        let r = FileResult {
            stem: "x".into(),
            source: PathBuf::from("x.pdf"),
            output: None,
            duration_ms: 0,
            outcome: Err(FileError::JobFailed {
                file: "x.pdf".into(),
                status: "CANCELED".into(),
            }),
        };
        assert_eq!(r.page_count(), 0);
        assert!(!r.is_ok());
    }
}
