//! LlamaParse REST client.
//!
//! The service is treated as an opaque black box: upload a PDF, poll the
//! job until it reaches a terminal state, fetch the page-segmented result.
//! Three endpoints, all under `/api/parsing`:
//!
//! ```text
//! POST /api/parsing/upload                  multipart file + hints → job id
//! GET  /api/parsing/job/{id}                status: PENDING | SUCCESS | ERROR | CANCELED
//! GET  /api/parsing/job/{id}/result/json    pages: [{ page, md, text }, …]
//! ```
//!
//! There is deliberately no retry logic here: a failed call becomes that
//! file's [`FileError`] and the batch moves on. The only looping is the
//! status poll, bounded by [`BatchConfig::job_timeout_secs`].

use crate::config::{BatchConfig, ResultFormat};
use crate::error::{BatchError, FileError};
use crate::output::Document;
use crate::parser::DocumentParser;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info};

/// Production [`DocumentParser`] backed by the LlamaParse cloud API.
pub struct LlamaParseClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    result_format: ResultFormat,
    language: String,
    num_workers: u32,
    verbose: bool,
    poll_interval: Duration,
    job_timeout: Duration,
}

impl LlamaParseClient {
    /// Build a client from a resolved credential and the batch config.
    pub fn new(api_key: impl Into<String>, config: &BatchConfig) -> Result<Self, BatchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| BatchError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            result_format: config.result_format,
            language: config.language.clone(),
            num_workers: config.num_workers,
            verbose: config.verbose,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
        })
    }

    async fn upload(&self, path: &Path, file_name: &str) -> Result<String, FileError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| FileError::Unreadable {
            file: file_name.to_string(),
            detail: e.to_string(),
        })?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| FileError::UploadFailed {
                file: file_name.to_string(),
                detail: e.to_string(),
            })?;

        // `num_workers` is an advisory hint for the service's worker pool;
        // this client still submits one file at a time.
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("language", self.language.clone())
            .text("num_workers", self.num_workers.to_string());

        let response = self
            .http
            .post(format!("{}/api/parsing/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FileError::UploadFailed {
                file: file_name.to_string(),
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FileError::UploadFailed {
                file: file_name.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let job: JobResponse = response.json().await.map_err(|e| FileError::UploadFailed {
            file: file_name.to_string(),
            detail: format!("invalid upload response: {e}"),
        })?;

        debug!("'{}': upload accepted, job {}", file_name, job.id);
        Ok(job.id)
    }

    /// Poll the job until it leaves `PENDING`, bounded by the job timeout.
    async fn wait_for_job(&self, job_id: &str, file_name: &str) -> Result<(), FileError> {
        let deadline = Instant::now() + self.job_timeout;

        loop {
            sleep(self.poll_interval).await;

            let response = self
                .http
                .get(format!("{}/api/parsing/job/{}", self.base_url, job_id))
                .bearer_auth(&self.api_key)
                .send()
                .await
                .map_err(|e| FileError::ResultFetchFailed {
                    file: file_name.to_string(),
                    detail: e.to_string(),
                })?;

            let status: JobResponse =
                response.json().await.map_err(|e| FileError::ResultFetchFailed {
                    file: file_name.to_string(),
                    detail: format!("invalid status response: {e}"),
                })?;

            debug!("'{}': job {} is {}", file_name, job_id, status.status);

            match status.status.as_str() {
                "SUCCESS" => return Ok(()),
                "PENDING" => {
                    if Instant::now() >= deadline {
                        return Err(FileError::JobTimeout {
                            file: file_name.to_string(),
                            secs: self.job_timeout.as_secs(),
                        });
                    }
                }
                other => {
                    return Err(FileError::JobFailed {
                        file: file_name.to_string(),
                        status: other.to_string(),
                    })
                }
            }
        }
    }

    async fn fetch_result(&self, job_id: &str, file_name: &str) -> Result<Vec<Document>, FileError> {
        let response = self
            .http
            .get(format!(
                "{}/api/parsing/job/{}/result/json",
                self.base_url, job_id
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| FileError::ResultFetchFailed {
                file: file_name.to_string(),
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FileError::ResultFetchFailed {
                file: file_name.to_string(),
                detail: format!("HTTP {}", response.status()),
            });
        }

        let result: JobResult = response.json().await.map_err(|e| FileError::ResultFetchFailed {
            file: file_name.to_string(),
            detail: format!("invalid result payload: {e}"),
        })?;

        // Page order as returned by the service is the document's reading
        // order; keep it untouched.
        let pages = result
            .pages
            .into_iter()
            .map(|p| {
                let text = match self.result_format {
                    ResultFormat::Markdown => p.md,
                    ResultFormat::Text => p.text,
                };
                Document::new(text.unwrap_or_default())
            })
            .collect();

        Ok(pages)
    }
}

#[async_trait]
impl DocumentParser for LlamaParseClient {
    async fn parse(&self, path: &Path) -> Result<Vec<Document>, FileError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        if self.verbose {
            info!("'{}': submitting to LlamaParse", file_name);
        }

        let job_id = self.upload(path, &file_name).await?;
        self.wait_for_job(&job_id, &file_name).await?;
        let pages = self.fetch_result(&job_id, &file_name).await?;

        if self.verbose {
            info!("'{}': parse complete, {} pages", file_name, pages.len());
        } else {
            debug!("'{}': parse complete, {} pages", file_name, pages.len());
        }

        Ok(pages)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JobResponse {
    id: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct JobResult {
    #[serde(default)]
    pages: Vec<ResultPage>,
}

#[derive(Debug, Deserialize)]
struct ResultPage {
    #[serde(default)]
    md: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_page_tolerates_missing_fields() {
        let result: JobResult =
            serde_json::from_str(r##"{"pages":[{"page":1,"md":"# Title"},{"page":2}]}"##).unwrap();
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.pages[0].md.as_deref(), Some("# Title"));
        assert!(result.pages[1].md.is_none());
        assert!(result.pages[1].text.is_none());
    }

    #[test]
    fn job_response_ignores_extra_fields() {
        let job: JobResponse =
            serde_json::from_str(r#"{"id":"abc123","status":"PENDING","extra":42}"#).unwrap();
        assert_eq!(job.id, "abc123");
        assert_eq!(job.status, "PENDING");
    }

    #[test]
    fn client_normalises_trailing_slash() {
        let config = BatchConfig::builder()
            .base_url("https://api.cloud.llamaindex.ai/")
            .build()
            .unwrap();
        let client = LlamaParseClient::new("llx-test", &config).unwrap();
        assert_eq!(client.base_url, "https://api.cloud.llamaindex.ai");
    }
}
