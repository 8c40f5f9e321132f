//! Configuration types for batch conversion.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. Keeping every knob in one struct means the
//! credential and service parameters are passed explicitly into the loader
//! rather than read from hidden process-wide state, and two runs can be
//! diffed by diffing their configs.

use crate::error::BatchError;
use crate::parser::DocumentParser;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default endpoint of the LlamaParse REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

/// Environment variable the credential falls back to.
pub const API_KEY_ENV: &str = "LLAMA_CLOUD_API_KEY";

/// Configuration for a batch conversion run.
///
/// Built via [`BatchConfig::builder()`] or using
/// [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use llamamd::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .language("ko")
///     .num_workers(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Explicit API credential. If `None`, the `LLAMA_CLOUD_API_KEY`
    /// environment variable is consulted when the parser is resolved.
    pub api_key: Option<String>,

    /// Pre-constructed parser. Takes precedence over any credential.
    /// This is the seam tests use to run the pipeline without network access.
    pub parser: Option<Arc<dyn DocumentParser>>,

    /// Output format requested from the service. Default: Markdown.
    pub result_format: ResultFormat,

    /// Language hint forwarded to the service. Default: `"ko"`.
    ///
    /// LlamaParse's OCR quality on Korean documents depends heavily on
    /// this hint; without it, Hangul on scanned pages comes back garbled.
    pub language: String,

    /// Worker-count hint forwarded to the service. Default: 8.
    ///
    /// Purely advisory: it sizes the service's internal worker pool. This
    /// crate itself submits files strictly one at a time and never uses
    /// the value for local concurrency.
    pub num_workers: u32,

    /// Per-file INFO logging from the loader. Default: true.
    ///
    /// When false the same messages are still emitted at DEBUG level.
    pub verbose: bool,

    /// Policy for the repeated-header heuristic applied while merging.
    /// Default: [`HeaderStrip::FirstParagraph`].
    pub header_strip: HeaderStrip,

    /// Delay between job-status polls in milliseconds. Default: 2000.
    pub poll_interval_ms: u64,

    /// Give up on a parse job that is still pending after this many
    /// seconds. Default: 600.
    ///
    /// Large scanned documents routinely take a few minutes server-side;
    /// ten minutes is generous without letting an abandoned job wedge an
    /// unattended batch forever.
    pub job_timeout_secs: u64,

    /// Timeout for each individual HTTP request (upload, poll, fetch)
    /// in seconds. Default: 120.
    pub request_timeout_secs: u64,

    /// Base URL of the parsing API. Default: [`DEFAULT_BASE_URL`].
    /// Overridable for self-hosted gateways and tests.
    pub base_url: String,

    /// Optional progress callback, invoked per file.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            parser: None,
            result_format: ResultFormat::default(),
            language: "ko".to_string(),
            num_workers: 8,
            verbose: true,
            header_strip: HeaderStrip::default(),
            poll_interval_ms: 2000,
            job_timeout_secs: 600,
            request_timeout_secs: 120,
            base_url: DEFAULT_BASE_URL.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("parser", &self.parser.as_ref().map(|_| "<dyn DocumentParser>"))
            .field("result_format", &self.result_format)
            .field("language", &self.language)
            .field("num_workers", &self.num_workers)
            .field("verbose", &self.verbose)
            .field("header_strip", &self.header_strip)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("job_timeout_secs", &self.job_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.config.parser = Some(parser);
        self
    }

    pub fn result_format(mut self, format: ResultFormat) -> Self {
        self.config.result_format = format;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn num_workers(mut self, n: u32) -> Self {
        self.config.num_workers = n.max(1);
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.config.verbose = v;
        self
    }

    pub fn header_strip(mut self, policy: HeaderStrip) -> Self {
        self.config.header_strip = policy;
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.poll_interval_ms = ms.max(100);
        self
    }

    pub fn job_timeout_secs(mut self, secs: u64) -> Self {
        self.config.job_timeout_secs = secs;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.num_workers == 0 {
            return Err(BatchError::InvalidConfig(
                "num_workers must be ≥ 1".into(),
            ));
        }
        if c.poll_interval_ms < 100 {
            return Err(BatchError::InvalidConfig(format!(
                "poll_interval_ms must be ≥ 100, got {}",
                c.poll_interval_ms
            )));
        }
        if c.base_url.is_empty() {
            return Err(BatchError::InvalidConfig("base_url must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Output format requested from the parsing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResultFormat {
    /// Page-segmented Markdown. (default)
    #[default]
    Markdown,
    /// Plain extracted text.
    Text,
}

impl ResultFormat {
    /// The field name carrying this format in the service's JSON result.
    pub fn result_field(&self) -> &'static str {
        match self {
            ResultFormat::Markdown => "md",
            ResultFormat::Text => "text",
        }
    }
}

/// Policy for the repeated-header heuristic applied to every page after
/// the first during merging.
///
/// The heuristic assumes each page re-prints the document title as its
/// first paragraph. That holds for the report layouts this tool was built
/// around, but a page whose real content starts immediately — or that has
/// no paragraph break at all — loses text to the strip. The policy is an
/// explicit enum so callers who know their layout can turn it off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeaderStrip {
    /// Drop the first double-newline-delimited paragraph of every page
    /// after the first, rejoining the rest with single newlines. (default)
    #[default]
    FirstParagraph,
    /// Keep every page verbatim.
    Keep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_the_service_profile() {
        let c = BatchConfig::default();
        assert_eq!(c.language, "ko");
        assert_eq!(c.num_workers, 8);
        assert!(c.verbose);
        assert_eq!(c.result_format, ResultFormat::Markdown);
        assert_eq!(c.header_strip, HeaderStrip::FirstParagraph);
    }

    #[test]
    fn builder_clamps_num_workers() {
        let c = BatchConfig::builder().num_workers(0).build().unwrap();
        assert_eq!(c.num_workers, 1);
    }

    #[test]
    fn build_rejects_empty_base_url() {
        let err = BatchConfig::builder().base_url("").build().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn debug_redacts_the_credential() {
        let c = BatchConfig::builder().api_key("llx-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("llx-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn result_field_names() {
        assert_eq!(ResultFormat::Markdown.result_field(), "md");
        assert_eq!(ResultFormat::Text.result_field(), "text");
    }
}
