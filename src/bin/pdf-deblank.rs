//! CLI binary for edgequake-deblank.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `DeblankConfig`, guards the input, and writes the cleaned PDF.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_deblank::clean::{default_output_path, write_atomic};
use edgequake_deblank::{
    analyze, clean_bytes_async, CleanReport, DeblankConfig, DeblankError,
    DeblankProgressCallback, Outcome, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one line per removed page.
struct CliProgressCallback {
    bar: ProgressBar,
    blanks: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_start` tells us the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            blanks: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Scanning");
        self.bar.reset_eta();
    }
}

impl DeblankProgressCallback for CliProgressCallback {
    fn on_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_classified(&self, page_num: usize, total_pages: usize, blank: bool) {
        if blank {
            self.blanks.fetch_add(1, Ordering::SeqCst);
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                cyan("○"),
                page_num,
                total_pages,
                dim("blank"),
            ));
        }
        self.bar.inc(1);
    }

    fn on_complete(&self, total_pages: usize, kept_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} of {} pages blank",
            green("✔"),
            bold(&self.blanks.load(Ordering::SeqCst).to_string()),
            total_pages,
        );
        tracing::debug!("{kept_pages} pages kept");
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Clean a scan; writes scan-cleaned.pdf next to it
  pdf-deblank scan.pdf

  # Choose the output file
  pdf-deblank scan.pdf -o clean.pdf

  # Show which pages would go, without writing anything
  pdf-deblank --dry-run scan.pdf

  # Machine-readable report
  pdf-deblank --dry-run --json scan.pdf > report.json

  # Tolerate more scanner noise (more pages count as blank)
  pdf-deblank --max-dark-ratio 0.002 --dark-threshold 240 scan.pdf

  # Trust the text/annotation layer only; never render
  pdf-deblank --structural-only export.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH             Path to libpdfium (else next to the binary, else system)
  PDF_DEBLANK_SCALE           Render scale for the ink check (default 2.0)
  PDF_DEBLANK_DARK_THRESHOLD  Gray value below which a pixel is ink (default 252)
  PDF_DEBLANK_MAX_DARK_RATIO  Ink fraction at or below which a page is blank (default 0.0008)
  PDF_DEBLANK_MARGIN          Border pixels ignored when counting ink (default 6)
  PDF_DEBLANK_NEAR_WHITE      Drawing colour channels at or above this are white (default 0.995)
  RUST_LOG                    Override log filtering (e.g. edgequake_deblank=debug)
"#;

/// Remove blank pages from a PDF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-deblank",
    version,
    about = "Remove blank pages from scanned and exported PDF documents",
    long_about = "Remove blank pages from a PDF. A page is kept if it carries text, \
annotations, links, images or coloured vector drawings; otherwise it is rendered \
and kept only if it shows more ink than --max-dark-ratio. If every page is blank \
the original document is kept as-is.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to clean.
    input: PathBuf,

    /// Write the cleaned PDF here instead of `<input>-cleaned.pdf`.
    #[arg(short, long, env = "PDF_DEBLANK_OUTPUT")]
    output: Option<PathBuf>,

    /// Render scale for the ink check (1.0 = 72 DPI).
    #[arg(long, env = "PDF_DEBLANK_SCALE", default_value_t = edgequake_deblank::config::DEFAULT_SCALE)]
    scale: f32,

    /// Gray value (0-255) below which a pixel counts as ink.
    #[arg(long, env = "PDF_DEBLANK_DARK_THRESHOLD",
          default_value_t = edgequake_deblank::config::DEFAULT_DARK_THRESHOLD)]
    dark_threshold: u8,

    /// Ink fraction at or below which a page is blank.
    #[arg(long, env = "PDF_DEBLANK_MAX_DARK_RATIO",
          default_value_t = edgequake_deblank::config::DEFAULT_MAX_DARK_RATIO)]
    max_dark_ratio: f64,

    /// Border width in pixels ignored when counting ink.
    #[arg(long, env = "PDF_DEBLANK_MARGIN",
          default_value_t = edgequake_deblank::config::DEFAULT_MARGIN_PX)]
    margin: u32,

    /// Drawing colour channels at or above this level count as white.
    #[arg(long, env = "PDF_DEBLANK_NEAR_WHITE",
          default_value_t = edgequake_deblank::config::DEFAULT_NEAR_WHITE)]
    near_white: f32,

    /// Skip rendering: a page without structural content is blank.
    #[arg(long, env = "PDF_DEBLANK_STRUCTURAL_ONLY")]
    structural_only: bool,

    /// Refuse inputs larger than this many megabytes.
    #[arg(long, env = "PDF_DEBLANK_MAX_SIZE_MB", default_value_t = 100)]
    max_size_mb: u64,

    /// Classify pages and print the report; write nothing.
    #[arg(long)]
    dry_run: bool,

    /// Print the per-page report as JSON on stdout.
    #[arg(long, env = "PDF_DEBLANK_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF_DEBLANK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_DEBLANK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_DEBLANK_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Guard the input ──────────────────────────────────────────────────
    let bytes = read_input(&cli).await?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn DeblankProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let report = tokio::task::spawn_blocking(move || analyze(&bytes, &config))
            .await
            .context("Classification task panicked")?
            .map_err(explain)?;
        print_report(&cli, &report)?;
        return Ok(());
    }

    // ── Clean and write ──────────────────────────────────────────────────
    let output = clean_bytes_async(bytes, &config).await.map_err(explain)?;
    let target = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));
    write_atomic(&target, &output.bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    if cli.json {
        print_report(&cli, &output.report)?;
    }
    if !cli.quiet {
        let stats = &output.report.stats;
        let note = match output.outcome {
            Outcome::Cleaned => format!("removed {}", stats.removed_pages),
            Outcome::Unchanged => "no blank pages".to_string(),
            Outcome::FallbackToOriginal => "every page blank; original kept".to_string(),
        };
        eprintln!(
            "{}  {}/{} pages kept  ({})  {}ms  →  {}",
            if output.outcome == Outcome::FallbackToOriginal {
                cyan("⚠")
            } else {
                green("✔")
            },
            stats.kept_pages,
            stats.total_pages,
            note,
            stats.duration_ms,
            bold(&target.display().to_string()),
        );
    }

    Ok(())
}

/// Read the input, rejecting empty and oversize files before any parsing.
async fn read_input(cli: &Cli) -> Result<Vec<u8>> {
    let meta = tokio::fs::metadata(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let limit = cli.max_size_mb.saturating_mul(1024 * 1024);
    if meta.len() > limit {
        anyhow::bail!(
            "{} is {} bytes, over the {} MB limit (--max-size-mb)",
            cli.input.display(),
            meta.len(),
            cli.max_size_mb
        );
    }

    let bytes = tokio::fs::read(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    if bytes.is_empty() {
        return Err(explain(DeblankError::EmptyInput));
    }
    Ok(bytes)
}

/// Map CLI args to `DeblankConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DeblankConfig> {
    let mut builder = DeblankConfig::builder()
        .scale(cli.scale)
        .dark_threshold(cli.dark_threshold)
        .max_dark_ratio(cli.max_dark_ratio)
        .margin_px(cli.margin)
        .near_white(cli.near_white)
        .skip_raster(cli.structural_only);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Lead with the short user-facing message, keep the detail underneath.
fn explain(err: DeblankError) -> anyhow::Error {
    let headline = err.user_message();
    anyhow::Error::new(err).context(headline)
}

fn print_report(cli: &Cli, report: &CleanReport) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }

    for verdict in &report.pages {
        println!(
            "page {:>4}  {:<6}  {:?}",
            verdict.page_num,
            if verdict.blank { "blank" } else { "keep" },
            verdict.reason
        );
    }
    if !cli.quiet {
        eprintln!(
            "{} of {} pages blank: {:?}",
            report.stats.removed_pages,
            report.stats.total_pages,
            report.blank_pages()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_tolerance_example_parses() {
        let cli = Cli::try_parse_from([
            "pdf-deblank",
            "--max-dark-ratio",
            "0.002",
            "--dark-threshold",
            "240",
            "scan.pdf",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.max_dark_ratio, 0.002);
        assert_eq!(config.dark_threshold, 240);
        assert!(AFTER_HELP.contains("Tolerate more scanner noise"));
    }

    #[test]
    fn defaults_match_library() {
        let cli = Cli::try_parse_from(["pdf-deblank", "scan.pdf"]).unwrap();
        let config = build_config(&cli, None).unwrap();
        let lib = DeblankConfig::default();
        assert_eq!(config.max_dark_ratio, lib.max_dark_ratio);
        assert_eq!(config.dark_threshold, lib.dark_threshold);
        assert_eq!(config.margin_px, lib.margin_px);
        assert_eq!(cli.max_size_mb, 100);
    }
}
