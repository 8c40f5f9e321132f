//! Batch entry points: load, convert, and the parser-resolution chain.
//!
//! Files are processed strictly one at a time. The parsing service runs
//! its own worker pool (sized by the `num_workers` hint), so local
//! concurrency would only multiply open uploads against the same quota;
//! the sequential loop also keeps per-file failure handling trivial.

use crate::client::LlamaParseClient;
use crate::config::{BatchConfig, API_KEY_ENV};
use crate::error::BatchError;
use crate::output::{BatchOutput, BatchStats, DocumentSet, FileResult};
use crate::parser::DocumentParser;
use crate::pipeline::{merge, scan, write};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Parse every PDF in `folder`, without merging or writing anything.
///
/// The credential is resolved before any file access, so a missing API
/// key fails the call even for an empty folder. A missing or empty folder
/// is not an error: the result is simply empty.
///
/// Each file gets its own `Result` inside [`FileResult`] — one file's
/// upload or job failure never discards the others' pages.
pub async fn parse_folder(
    folder: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<Vec<FileResult>, BatchError> {
    let parser = resolve_parser(config)?;
    let pdf_files = scan::scan_folder(folder);

    let mut results = Vec::with_capacity(pdf_files.len());
    for path in pdf_files {
        results.push(parse_one(&parser, path).await);
    }
    Ok(results)
}

/// Parse every PDF in `folder` into a mapping from filename stem to its
/// ordered page sequence.
///
/// Convenience over [`parse_folder`] for callers who only want the
/// successes; failed files are logged and omitted from the map.
pub async fn load_folder(
    folder: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BTreeMap<String, DocumentSet>, BatchError> {
    let results = parse_folder(folder, config).await?;

    let mut documents = BTreeMap::new();
    for result in results {
        match result.outcome {
            Ok(set) => {
                documents.insert(set.stem.clone(), set);
            }
            Err(e) => warn!("skipping '{}': {}", result.stem, e),
        }
    }
    Ok(documents)
}

/// Run the full pipeline over a folder: scan → parse → merge → write.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(BatchOutput)` on success, even if some files failed
/// (check `output.stats.failed_files`).
///
/// # Errors
/// Returns `Err(BatchError)` only for fatal errors: a missing credential,
/// or an output folder that cannot be created or written.
pub async fn convert_folder(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchOutput, BatchError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();
    info!(
        "starting batch conversion: '{}' → '{}'",
        input.display(),
        output.display()
    );

    // ── Step 1: Resolve the parser (credential check first) ──────────────
    let parser = resolve_parser(config)?;

    // ── Step 2: Scan the input folder ────────────────────────────────────
    let pdf_files = scan::scan_folder(input);
    let total_files = pdf_files.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total_files);
    }

    // ── Step 3: Parse, merge, write — one file at a time ─────────────────
    let mut files: Vec<FileResult> = Vec::with_capacity(total_files);
    let mut total_pages = 0usize;

    for (index, path) in pdf_files.into_iter().enumerate() {
        let stem = scan::file_stem(&path);
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(&stem, index, total_files);
        }

        let mut result = parse_one(&parser, path).await;

        match &result.outcome {
            Ok(set) => {
                let merged = merge::merge_pages(&set.pages, config.header_strip);
                let written = write::write_merged(output, &set.stem, &merged).await?;

                total_pages += set.page_count();
                if config.verbose {
                    info!(
                        "'{}.pdf' converted: {} pages → '{}'",
                        set.stem,
                        set.page_count(),
                        written.display()
                    );
                } else {
                    debug!("'{}.pdf' converted: {} pages", set.stem, set.page_count());
                }
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_complete(&set.stem, set.page_count(), merged.len());
                }
                result.output = Some(written);
            }
            Err(e) => {
                warn!("'{}': {}", result.stem, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_file_error(&result.stem, &e.to_string());
                }
            }
        }

        files.push(result);
    }

    // ── Step 4: Compute stats ────────────────────────────────────────────
    let converted = files.iter().filter(|f| f.is_ok()).count();
    let stats = BatchStats {
        total_files,
        converted_files: converted,
        failed_files: total_files - converted,
        total_pages,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "batch complete: {}/{} files, {} pages, {}ms",
        converted, total_files, total_pages, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total_files, converted);
    }

    Ok(BatchOutput { files, stats })
}

/// Convert a single PDF and write its merged Markdown next to the batch
/// output, returning the written path.
///
/// Unlike the folder entry points, a parse failure here is promoted to a
/// fatal [`BatchError`] — with one file there is no batch to continue.
pub async fn convert_file(
    pdf: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<PathBuf, BatchError> {
    let pdf = pdf.as_ref();
    let parser = resolve_parser(config)?;

    let pages = parser.parse(pdf).await?;
    let stem = scan::file_stem(pdf);
    let merged = merge::merge_pages(&pages, config.header_strip);
    write::write_merged(output_dir, &stem, &merged).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the document parser, from most-specific to least-specific:
///
/// 1. **Pre-built parser** (`config.parser`) — used as-is; no credential
///    needed. This is how tests inject a mock.
/// 2. **Explicit credential** (`config.api_key`).
/// 3. **Environment** (`LLAMA_CLOUD_API_KEY`) — read here, once, rather
///    than deep inside the client, so a missing credential surfaces
///    before any file access.
fn resolve_parser(config: &BatchConfig) -> Result<Arc<dyn DocumentParser>, BatchError> {
    if let Some(ref parser) = config.parser {
        return Ok(Arc::clone(parser));
    }

    let api_key = match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => key,
            _ => return Err(BatchError::MissingApiKey),
        },
    };

    let prefix: String = api_key.chars().take(5).collect();
    debug!("API credential resolved ({prefix}…)");
    let client = LlamaParseClient::new(api_key, config)?;
    Ok(Arc::new(client))
}

/// Parse one file, capturing the outcome and timing.
async fn parse_one(parser: &Arc<dyn DocumentParser>, path: PathBuf) -> FileResult {
    let stem = scan::file_stem(&path);
    let start = Instant::now();

    let outcome = parser
        .parse(&path)
        .await
        .map(|pages| DocumentSet::new(stem.clone(), pages));

    FileResult {
        stem,
        source: path,
        output: None,
        duration_ms: start.elapsed().as_millis() as u64,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_built_parser_skips_credential_lookup() {
        use crate::error::FileError;
        use crate::output::Document;

        struct Stub;

        #[async_trait::async_trait]
        impl DocumentParser for Stub {
            async fn parse(&self, _path: &Path) -> Result<Vec<Document>, FileError> {
                Ok(vec![])
            }
        }

        let config = BatchConfig::builder()
            .parser(Arc::new(Stub))
            .build()
            .unwrap();
        assert!(resolve_parser(&config).is_ok());
    }

    #[test]
    fn explicit_key_builds_a_client() {
        let config = BatchConfig::builder().api_key("llx-test").build().unwrap();
        assert!(resolve_parser(&config).is_ok());
    }

    #[test]
    fn empty_explicit_key_falls_through() {
        // An empty string is treated as unset; with no env var either,
        // resolution must fail. tests/batch.rs covers the env fallback
        // itself (env mutation is kept to a single test binary).
        let config = BatchConfig::builder().api_key("").build().unwrap();
        std::env::remove_var(API_KEY_ENV);
        assert!(matches!(
            resolve_parser(&config),
            Err(BatchError::MissingApiKey)
        ));
    }
}
