//! Error types for the llamamd library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BatchError`] — **Fatal**: the batch cannot proceed at all (missing
//!   API credential, invalid configuration, output folder not writable).
//!   Returned as `Err(BatchError)` from the top-level `convert*` functions.
//!
//! * [`FileError`] — **Non-fatal**: a single PDF failed (upload rejected,
//!   parse job errored, job timed out) but every other file is fine.
//!   Stored inside [`crate::output::FileResult`] so callers can inspect
//!   partial success rather than losing the whole batch to one bad file.
//!
//! A missing or empty *input* folder is deliberately neither: the scanner
//! reports it via `tracing::warn!` and the batch completes with nothing to
//! do, so an unattended run never aborts on an empty drop directory.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the llamamd library.
///
/// Per-file failures use [`FileError`] and are stored in
/// [`crate::output::FileResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// No API credential could be resolved.
    #[error(
        "LLAMA_CLOUD_API_KEY is not set.\n\
         Export it, add it to a .env file, or pass it explicitly via \
         BatchConfig::builder().api_key(..)."
    )]
    MissingApiKey,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output Markdown file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Promotion for single-file APIs ────────────────────────────────────
    /// A per-file failure, promoted to fatal by [`crate::convert::convert_file`].
    #[error(transparent)]
    File(#[from] FileError),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single PDF file.
///
/// Stored alongside [`crate::output::FileResult`] when a file fails.
/// The overall batch continues regardless.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The file could not be read from disk before upload.
    #[error("'{file}': cannot read file: {detail}")]
    Unreadable { file: String, detail: String },

    /// The upload request was rejected or failed in transit.
    #[error("'{file}': upload failed: {detail}")]
    UploadFailed { file: String, detail: String },

    /// The parse job finished in a terminal non-success state.
    #[error("'{file}': parse job ended with status '{status}'")]
    JobFailed { file: String, status: String },

    /// The parse job did not reach a terminal state within the deadline.
    #[error("'{file}': parse job still pending after {secs}s")]
    JobTimeout { file: String, secs: u64 },

    /// The job succeeded but its result could not be fetched or decoded.
    #[error("'{file}': failed to fetch parse result: {detail}")]
    ResultFetchFailed { file: String, detail: String },
}

impl FileError {
    /// The display name of the file this error belongs to.
    pub fn file(&self) -> &str {
        match self {
            FileError::Unreadable { file, .. }
            | FileError::UploadFailed { file, .. }
            | FileError::JobFailed { file, .. }
            | FileError::JobTimeout { file, .. }
            | FileError::ResultFetchFailed { file, .. } => file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_names_the_variable() {
        let msg = BatchError::MissingApiKey.to_string();
        assert!(msg.contains("LLAMA_CLOUD_API_KEY"), "got: {msg}");
    }

    #[test]
    fn job_failed_display() {
        let e = FileError::JobFailed {
            file: "report.pdf".into(),
            status: "ERROR".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("report.pdf"));
        assert!(msg.contains("ERROR"));
    }

    #[test]
    fn job_timeout_display() {
        let e = FileError::JobTimeout {
            file: "slides.pdf".into(),
            secs: 600,
        };
        assert!(e.to_string().contains("600s"));
    }

    #[test]
    fn file_accessor_matches_variant() {
        let e = FileError::UploadFailed {
            file: "a.pdf".into(),
            detail: "connection reset".into(),
        };
        assert_eq!(e.file(), "a.pdf");
    }

    #[test]
    fn file_error_promotes_to_batch_error() {
        let e = FileError::Unreadable {
            file: "gone.pdf".into(),
            detail: "no such file".into(),
        };
        let fatal: BatchError = e.into();
        assert!(fatal.to_string().contains("gone.pdf"));
    }
}
