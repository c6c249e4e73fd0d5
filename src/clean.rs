//! Cleaning entry points: bytes in, bytes out.
//!
//! [`clean_bytes`] is the primary API. It never hands back an empty result
//! for a non-empty input: when every page is blank (or the PDF has none) the
//! original bytes come back with [`Outcome::FallbackToOriginal`], and when no
//! page is blank the original bytes come back with [`Outcome::Unchanged`], so
//! cleaning an already-clean document is a byte-for-byte no-op.

use crate::backend::{shared_pdfium, PdfiumDocument};
use crate::classify::PageVerdict;
use crate::config::DeblankConfig;
use crate::document::Document;
use crate::error::DeblankError;
use crate::output::{CleanOutput, CleanReport, Outcome};
use crate::reconstruct::{self, Rebuilt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Remove blank pages from a PDF held in memory.
///
/// # Errors
/// - [`DeblankError::EmptyInput`] for zero bytes
/// - [`DeblankError::InvalidOrEncryptedDocument`] if pdfium cannot open it
/// - [`DeblankError::ProcessingFailure`] if any page fails
/// - [`DeblankError::EngineUnavailable`] if pdfium cannot be bound
///
/// # Example
/// ```rust,no_run
/// use edgequake_deblank::{clean_bytes, DeblankConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("scan.pdf")?;
/// let output = clean_bytes(&bytes, &DeblankConfig::default())?;
/// std::fs::write("scan-cleaned.pdf", &output.bytes)?;
/// eprintln!("removed {} pages", output.report.stats.removed_pages);
/// # Ok(())
/// # }
/// ```
pub fn clean_bytes(bytes: &[u8], config: &DeblankConfig) -> Result<CleanOutput, DeblankError> {
    check_input(bytes, config)?;
    let doc = PdfiumDocument::open(shared_pdfium()?, bytes)?;
    clean_document(&doc, bytes, config)
}

/// Remove blank pages from an already-opened document.
///
/// `original` must be the bytes `doc` was opened from; they are returned
/// as-is for the unchanged and fallback outcomes.
pub fn clean_document<D: Document + ?Sized>(
    doc: &D,
    original: &[u8],
    config: &DeblankConfig,
) -> Result<CleanOutput, DeblankError> {
    let start = Instant::now();
    let (rebuilt, verdicts) = reconstruct::strip_blank_pages(doc, config)?;
    let report = CleanReport::from_verdicts(verdicts, start.elapsed().as_millis() as u64);

    let (bytes, outcome) = match rebuilt {
        Rebuilt::Filtered(bytes) => (bytes, Outcome::Cleaned),
        Rebuilt::NothingRemoved => (original.to_vec(), Outcome::Unchanged),
        Rebuilt::NothingKept => {
            warn!(
                "All {} pages judged blank; returning the original document",
                report.stats.total_pages
            );
            (original.to_vec(), Outcome::FallbackToOriginal)
        }
    };

    info!(
        "Clean complete: kept {}/{} pages ({:?}) in {}ms",
        report.stats.kept_pages, report.stats.total_pages, outcome, report.stats.duration_ms
    );
    Ok(CleanOutput {
        bytes,
        outcome,
        report,
    })
}

/// The raw reconstruction contract: the filtered PDF, or an EMPTY vector when
/// no page survived. Callers must substitute the input for an empty result;
/// [`clean_bytes`] does that for you.
///
/// When no page is blank the document is still rebuilt, so the output is a
/// fresh serialisation rather than the input bytes.
pub fn strip_blank_pages(bytes: &[u8], config: &DeblankConfig) -> Result<Vec<u8>, DeblankError> {
    check_input(bytes, config)?;
    let doc = PdfiumDocument::open(shared_pdfium()?, bytes)?;
    let verdicts = reconstruct::classify_document(&doc, config)?;
    let kept = reconstruct::kept_indices(&verdicts);
    if kept.is_empty() {
        return Ok(Vec::new());
    }
    doc.extract_pages(&kept)
}

/// Classify every page without building an output document.
pub fn analyze(bytes: &[u8], config: &DeblankConfig) -> Result<CleanReport, DeblankError> {
    check_input(bytes, config)?;
    let doc = PdfiumDocument::open(shared_pdfium()?, bytes)?;
    analyze_document(&doc, config)
}

/// Classify every page of an already-opened document.
pub fn analyze_document<D: Document + ?Sized>(
    doc: &D,
    config: &DeblankConfig,
) -> Result<CleanReport, DeblankError> {
    let start = Instant::now();
    let verdicts: Vec<PageVerdict> = reconstruct::classify_document(doc, config)?;
    Ok(CleanReport::from_verdicts(
        verdicts,
        start.elapsed().as_millis() as u64,
    ))
}

/// Async wrapper around [`clean_bytes`].
///
/// pdfium is blocking and not async-safe, so the work runs on
/// `tokio::task::spawn_blocking`.
pub async fn clean_bytes_async(
    bytes: Vec<u8>,
    config: &DeblankConfig,
) -> Result<CleanOutput, DeblankError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || clean_bytes(&bytes, &config))
        .await
        .map_err(|e| DeblankError::document_failure(format!("Clean task panicked: {}", e)))?
}

/// Clean a PDF file and write the result.
///
/// With `output_path = None` the result goes next to the input, named by
/// [`cleaned_filename`]. Uses atomic write (temp file + rename) so a
/// failed run never leaves a truncated PDF behind. Returns the path written.
pub fn clean_file(
    input_path: &Path,
    output_path: Option<&Path>,
    config: &DeblankConfig,
) -> Result<(PathBuf, CleanOutput), DeblankError> {
    let bytes = std::fs::read(input_path).map_err(|e| DeblankError::InputReadFailed {
        path: input_path.to_path_buf(),
        source: e,
    })?;
    let output = clean_bytes(&bytes, config)?;

    let target = match output_path {
        Some(p) => p.to_path_buf(),
        None => default_output_path(input_path),
    };
    write_atomic(&target, &output.bytes)?;
    Ok((target, output))
}

/// `<dir of input>/<cleaned_filename(input name)>`.
pub fn default_output_path(input_path: &Path) -> PathBuf {
    let name = cleaned_filename(input_path.file_name().and_then(|n| n.to_str()));
    match input_path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Download name for a cleaned document.
///
/// The original name's stem plus `-cleaned.pdf`. Directory components are
/// dropped. Without a usable name the stem is a generated `cleaned-<uuid>`,
/// giving `cleaned-<uuid>-cleaned.pdf`.
///
/// ```rust
/// use edgequake_deblank::cleaned_filename;
///
/// assert_eq!(cleaned_filename(Some("scan.pdf")), "scan-cleaned.pdf");
/// assert!(cleaned_filename(None).starts_with("cleaned-"));
/// ```
pub fn cleaned_filename(original: Option<&str>) -> String {
    let stem = original
        .map(str::trim)
        .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name))
        .map(|base| match base.rfind('.') {
            Some(dot) if dot > 0 => &base[..dot],
            _ => base,
        })
        .map(str::trim)
        .filter(|stem| !stem.is_empty());

    match stem {
        Some(stem) => format!("{stem}-cleaned.pdf"),
        None => format!("cleaned-{}-cleaned.pdf", uuid::Uuid::new_v4().simple()),
    }
}

/// Write `bytes` to `path` via a temp file in the same directory + rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DeblankError> {
    let write_err = |e: std::io::Error| DeblankError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn check_input(bytes: &[u8], config: &DeblankConfig) -> Result<(), DeblankError> {
    config.validate()?;
    if bytes.is_empty() {
        return Err(DeblankError::EmptyInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, MemoryPage};

    fn run(doc: &MemoryDocument) -> CleanOutput {
        let bytes = doc.to_bytes().unwrap();
        let parsed = MemoryDocument::from_bytes(&bytes).unwrap();
        clean_document(&parsed, &bytes, &DeblankConfig::default()).unwrap()
    }

    #[test]
    fn cleaned_filename_uses_stem() {
        assert_eq!(cleaned_filename(Some("report.pdf")), "report-cleaned.pdf");
        assert_eq!(cleaned_filename(Some("report")), "report-cleaned.pdf");
        assert_eq!(cleaned_filename(Some("a.b.pdf")), "a.b-cleaned.pdf");
        assert_eq!(
            cleaned_filename(Some("../../etc/scan.PDF")),
            "scan-cleaned.pdf"
        );
        assert_eq!(
            cleaned_filename(Some(r"C:\Users\me\scan.pdf")),
            "scan-cleaned.pdf"
        );
        assert_eq!(cleaned_filename(Some(".hidden")), ".hidden-cleaned.pdf");
    }

    #[test]
    fn cleaned_filename_generates_unique_fallback() {
        let a = cleaned_filename(Some("   "));
        let b = cleaned_filename(None);
        assert!(a.starts_with("cleaned-") && a.ends_with("-cleaned.pdf"), "got: {a}");
        assert_ne!(a, b);
        assert_eq!(a.len(), "cleaned-".len() + 32 + "-cleaned.pdf".len());
        assert!(a["cleaned-".len().."cleaned-".len() + 32]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn default_output_path_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("/tmp/in/scan.pdf")),
            PathBuf::from("/tmp/in/scan-cleaned.pdf")
        );
    }

    #[test]
    fn empty_input_is_rejected_before_pdfium() {
        let err = clean_bytes(&[], &DeblankConfig::default()).unwrap_err();
        assert!(matches!(err, DeblankError::EmptyInput));
        let err = analyze(&[], &DeblankConfig::default()).unwrap_err();
        assert!(matches!(err, DeblankError::EmptyInput));
    }

    #[test]
    fn invalid_config_is_rejected_before_pdfium() {
        let mut config = DeblankConfig::default();
        config.max_dark_ratio = 2.0;
        let err = strip_blank_pages(b"%PDF-1.7", &config).unwrap_err();
        assert!(matches!(err, DeblankError::InvalidConfig(_)));
    }

    #[test]
    fn all_blank_falls_back_to_original() {
        let doc = MemoryDocument::new(vec![MemoryPage::default(), MemoryPage::blank(10, 10)]);
        let out = run(&doc);
        assert_eq!(out.outcome, Outcome::FallbackToOriginal);
        assert_eq!(out.bytes, doc.to_bytes().unwrap());
        assert_eq!(out.report.stats.removed_pages, 2);
    }

    #[test]
    fn zero_pages_falls_back_to_original() {
        let out = run(&MemoryDocument::default());
        assert_eq!(out.outcome, Outcome::FallbackToOriginal);
        assert!(!out.bytes.is_empty());
    }

    #[test]
    fn rerun_is_idempotent() {
        let doc = MemoryDocument::new(vec![
            MemoryPage::default().labeled("keep").with_text("hello"),
            MemoryPage::default().labeled("drop"),
        ]);
        let first = run(&doc);
        assert_eq!(first.outcome, Outcome::Cleaned);

        let parsed = MemoryDocument::from_bytes(&first.bytes).unwrap();
        let second = clean_document(&parsed, &first.bytes, &DeblankConfig::default()).unwrap();
        assert_eq!(second.outcome, Outcome::Unchanged);
        assert_eq!(second.bytes, first.bytes);
    }

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.pdf");
        write_atomic(&path, b"%PDF-1.7 test").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7 test");

        write_atomic(&path, b"replaced").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"replaced");
    }

    #[test]
    fn clean_file_reports_missing_input() {
        let err = clean_file(
            Path::new("/definitely/not/here.pdf"),
            None,
            &DeblankConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DeblankError::InputReadFailed { .. }));
    }
}
