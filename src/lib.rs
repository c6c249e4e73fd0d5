//! # edgequake-deblank
//!
//! Remove blank pages from scanned and exported PDF documents.
//!
//! Scanners feeding duplex stacks and office exports with stray page breaks
//! leave empty sheets behind. This crate judges every page "blank" or
//! "contentful" and rebuilds the document from the contentful ones, in their
//! original order.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Open       pdfium, read-only (encrypted / malformed → error)
//!  ├─ 2. Structure  annotations, links, words, images, coloured drawings
//!  ├─ 3. Raster     only if 2 found nothing: render gray, count dark pixels
//!  ├─ 4. Rebuild    copy surviving pages into a new document, in order
//!  └─ 5. Fallback   nothing survived → hand back the original bytes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_deblank::{clean_bytes, DeblankConfig, Outcome};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = std::fs::read("scan.pdf")?;
//!     let output = clean_bytes(&input, &DeblankConfig::default())?;
//!     if output.outcome == Outcome::Cleaned {
//!         std::fs::write("scan-cleaned.pdf", &output.bytes)?;
//!     }
//!     eprintln!("blank pages: {:?}", output.report.blank_pages());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-deblank` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Runtime requirement
//!
//! The pdfium shared library must be loadable: set `PDFIUM_LIB_PATH`, place
//! it next to the executable, or install it system-wide. The classifier
//! itself runs against the [`Document`] / [`Page`] traits and can be driven
//! without pdfium through [`document::memory`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod classify;
pub mod clean;
pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod progress;
pub mod reconstruct;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use classify::raster::{raster_looks_blank, InkCoverage, RasterParams};
pub use classify::structure::has_structural_content;
pub use classify::{classify_page, is_blank, BlankReason, PageVerdict, StructuralSignal};
pub use clean::{
    analyze, analyze_document, clean_bytes, clean_bytes_async, clean_document, clean_file,
    cleaned_filename, strip_blank_pages,
};
pub use config::{DeblankConfig, DeblankConfigBuilder};
pub use document::{Document, Drawing, Page, Rgb};
pub use error::DeblankError;
pub use output::{CleanOutput, CleanReport, CleanStats, Outcome};
pub use progress::{DeblankProgressCallback, NoopProgressCallback, ProgressCallback};
