//! CLI binary for llamamd.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `BatchConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use llamamd::{
    convert_folder, load_folder, BatchConfig, BatchProgressCallback, HeaderStrip, ProgressCallback,
    ResultFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across the batch plus a ✓/✗ log
/// line per file.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> std::sync::Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        std::sync::Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>2}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_files as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_files} PDF file(s)…"))
        ));
    }

    fn on_file_start(&self, stem: &str, _index: usize, _total_files: usize) {
        self.bar.set_message(format!("{stem}.pdf"));
    }

    fn on_file_complete(&self, stem: &str, pages: usize, bytes: usize) {
        self.bar.println(format!(
            "  {} {:<30}  {:>3} pages  {}",
            green("✓"),
            format!("{stem}.pdf"),
            pages,
            dim(&format!("{bytes} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, stem: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let head: String = error.chars().take(79).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar
            .println(format!("  {} {:<30}  {}", red("✗"), format!("{stem}.pdf"), red(&msg)));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, converted: usize) {
        self.bar.finish_and_clear();
        let failed = total_files.saturating_sub(converted);

        if failed == 0 {
            eprintln!(
                "{} {} file(s) converted successfully",
                green("✔"),
                bold(&converted.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files converted  ({} failed)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every PDF in ./data into ./pdf2markdown (defaults)
  llamamd

  # Explicit folders
  llamamd reports -o reports-md

  # English documents, plain-text output
  llamamd --language en --format text

  # Keep repeated page headers instead of stripping them
  llamamd --keep-headers

  # One file per page instead of one merged file per PDF
  llamamd --per-page

SETUP:
  1. Get an API key at https://cloud.llamaindex.ai
  2. export LLAMA_CLOUD_API_KEY=llx-...   (or put it in a .env file)
  3. llamamd

Parsing runs entirely on LlamaParse's servers; files are uploaded one at
a time and the --workers value is only a hint to the service's own pool.
"#;

/// Batch-convert a folder of PDF files to Markdown via LlamaParse.
#[derive(Parser, Debug)]
#[command(
    name = "llamamd",
    version,
    about = "Batch-convert folders of PDF files to Markdown via the LlamaParse cloud API",
    long_about = "Scan a folder for PDF files, parse each one with the LlamaParse cloud API, \
merge the per-page Markdown into one document per PDF (dropping repeated page headers), and \
write the results to an output folder.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Folder containing the PDF files to convert.
    #[arg(default_value = "data")]
    input: PathBuf,

    /// Folder the Markdown files are written to.
    #[arg(short, long, env = "LLAMAMD_OUTPUT", default_value = "pdf2markdown")]
    output: PathBuf,

    /// LlamaParse API key.
    #[arg(long, env = "LLAMA_CLOUD_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Language hint forwarded to the parsing service.
    #[arg(short, long, env = "LLAMAMD_LANGUAGE", default_value = "ko")]
    language: String,

    /// Worker-count hint forwarded to the parsing service.
    #[arg(short = 'w', long, env = "LLAMAMD_WORKERS", default_value_t = 8)]
    workers: u32,

    /// Result format requested from the service.
    #[arg(long, env = "LLAMAMD_FORMAT", value_enum, default_value = "markdown")]
    format: FormatArg,

    /// Keep the leading paragraph of every page instead of stripping the
    /// repeated header.
    #[arg(long, env = "LLAMAMD_KEEP_HEADERS")]
    keep_headers: bool,

    /// Write each page as document_<n>.md instead of one merged file per PDF.
    #[arg(long)]
    per_page: bool,

    /// Seconds between job-status polls.
    #[arg(long, env = "LLAMAMD_POLL_INTERVAL", default_value_t = 2)]
    poll_interval: u64,

    /// Give up on a parse job still pending after this many seconds.
    #[arg(long, env = "LLAMAMD_JOB_TIMEOUT", default_value_t = 600)]
    job_timeout: u64,

    /// Base URL of the parsing API (self-hosted gateways).
    #[arg(long, env = "LLAMAMD_BASE_URL")]
    base_url: Option<String>,

    /// Print the batch report (per-file results and stats) as JSON on stdout.
    #[arg(long, env = "LLAMAMD_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "LLAMAMD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LLAMAMD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LLAMAMD_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Markdown,
    Text,
}

impl From<FormatArg> for ResultFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Markdown => ResultFormat::Markdown,
            FormatArg::Text => ResultFormat::Text,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    // The per-page path reports per document, not per file, so the bar
    // only runs for the merged pipeline.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.per_page && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as ProgressCallback)
    } else {
        None
    };

    let mut builder = BatchConfig::builder()
        .language(cli.language.as_str())
        .num_workers(cli.workers)
        .result_format(cli.format.clone().into())
        .header_strip(if cli.keep_headers {
            HeaderStrip::Keep
        } else {
            HeaderStrip::FirstParagraph
        })
        .verbose(!cli.quiet)
        .poll_interval_ms(cli.poll_interval.saturating_mul(1000))
        .job_timeout_secs(cli.job_timeout);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.as_str());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.as_str());
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    if cli.per_page {
        run_per_page(&cli, &config).await
    } else {
        run_merged(&cli, &config).await
    }
}

/// Default path: one merged Markdown file per source PDF.
async fn run_merged(cli: &Cli, config: &BatchConfig) -> Result<()> {
    let output = convert_folder(&cli.input, &cli.output, config)
        .await
        .context("Batch conversion failed")?;

    if cli.json {
        let report =
            serde_json::to_string_pretty(&output).context("Failed to serialise batch report")?;
        println!("{report}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {}/{} files  {} pages  {}ms  →  {}",
            if output.stats.failed_files == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.converted_files,
            output.stats.total_files,
            output.stats.total_pages,
            output.stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        for file in output.files.iter().filter(|f| !f.is_ok()) {
            if let Err(ref e) = file.outcome {
                eprintln!("   {} {}", red("✗"), e);
            }
        }
    }

    // A batch where nothing converted exits non-zero so cron jobs notice.
    if output.stats.failed_files > 0 && output.stats.converted_files == 0 {
        anyhow::bail!("all {} file(s) failed", output.stats.failed_files);
    }
    Ok(())
}

/// Alternate path: each page of each PDF as its own numbered file, in a
/// subfolder per source document.
async fn run_per_page(cli: &Cli, config: &BatchConfig) -> Result<()> {
    let documents = load_folder(&cli.input, config)
        .await
        .context("Batch parsing failed")?;

    for (stem, set) in &documents {
        let dir = cli.output.join(stem);
        let written = llamamd::pipeline::write::write_pages(&dir, set)
            .await
            .with_context(|| format!("Failed to write pages for '{stem}'"))?;
        if !cli.quiet {
            eprintln!(
                "{} {:<30} {} page file(s) → {}",
                green("✓"),
                format!("{stem}.pdf"),
                written.len(),
                dim(&dir.display().to_string()),
            );
        }
    }

    if !cli.quiet {
        eprintln!(
            "{} {} document(s) written per-page",
            green("✔"),
            bold(&documents.len().to_string())
        );
    }
    Ok(())
}
