//! Error types for the edgequake-deblank library.
//!
//! The core pipeline fails in exactly three ways:
//!
//! * [`DeblankError::EmptyInput`]: zero bytes were supplied. The boundary
//!   checks this before the core runs; the core re-checks it so library
//!   callers get the same answer.
//! * [`DeblankError::InvalidOrEncryptedDocument`]: the bytes are not a
//!   well-formed, unlocked PDF.
//! * [`DeblankError::ProcessingFailure`]: the document opened but a page
//!   could not be inspected, rasterised or copied. One bad page aborts the
//!   whole document: a partially rebuilt PDF is never returned.
//!
//! The remaining variants belong to the boundary (configuration, engine
//! binding, file I/O). "Every page was blank" is not an error at all; it is
//! reported as [`crate::output::Outcome::FallbackToOriginal`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-deblank library.
#[derive(Debug, Error)]
pub enum DeblankError {
    // ── Core errors ───────────────────────────────────────────────────────
    /// Zero-length input.
    #[error("Input document is empty (0 bytes)")]
    EmptyInput,

    /// The bytes could not be opened as an unlocked PDF.
    #[error("Not a valid PDF, or the PDF is encrypted: {detail}")]
    InvalidOrEncryptedDocument { detail: String },

    /// Page extraction, rasterisation or reassembly failed.
    ///
    /// `page` is 1-indexed; `None` when the failure is not tied to a page
    /// (for example while serialising the output document).
    #[error("{}", processing_failure_message(*page, detail))]
    ProcessingFailure { page: Option<usize>, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library next to the\n\
executable, or install it where the system loader can find it.\n"
    )]
    EngineUnavailable(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input file.
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn processing_failure_message(page: Option<usize>, detail: &str) -> String {
    match page {
        Some(p) => format!("Failed to process page {p}: {detail}"),
        None => format!("Failed to process document: {detail}"),
    }
}

impl DeblankError {
    /// Shorthand for a page-level [`DeblankError::ProcessingFailure`].
    ///
    /// `index` is 0-based; the stored page number is 1-based.
    pub fn page_failure(index: usize, detail: impl Into<String>) -> Self {
        DeblankError::ProcessingFailure {
            page: Some(index + 1),
            detail: detail.into(),
        }
    }

    /// Shorthand for a document-level [`DeblankError::ProcessingFailure`].
    pub fn document_failure(detail: impl Into<String>) -> Self {
        DeblankError::ProcessingFailure {
            page: None,
            detail: detail.into(),
        }
    }

    /// The message shown to the person who submitted the document.
    ///
    /// Internal details stay in the `Display` output and the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            DeblankError::EmptyInput => "Uploaded file is empty.",
            DeblankError::InvalidOrEncryptedDocument { .. } => {
                "This PDF seems encrypted or invalid. Upload an unlocked/valid PDF."
            }
            DeblankError::ProcessingFailure { .. } => "Failed to process PDF.",
            DeblankError::InvalidConfig(_) => "Invalid settings. Check the options and try again.",
            DeblankError::EngineUnavailable(_) => "The PDF engine is not available on this machine.",
            DeblankError::InputReadFailed { .. } => "The file could not be read.",
            DeblankError::OutputWriteFailed { .. } => "The cleaned file could not be written.",
        }
    }

    /// `true` for errors caused by the submitted document rather than the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DeblankError::EmptyInput
                | DeblankError::InvalidOrEncryptedDocument { .. }
                | DeblankError::ProcessingFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_failure_is_one_indexed() {
        let e = DeblankError::page_failure(2, "text extraction failed");
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("text extraction failed"));
    }

    #[test]
    fn document_failure_display() {
        let e = DeblankError::document_failure("save failed");
        assert_eq!(e.to_string(), "Failed to process document: save failed");
    }

    #[test]
    fn user_messages_hide_details() {
        let e = DeblankError::InvalidOrEncryptedDocument {
            detail: "PdfiumLibraryInternalError(PasswordError)".into(),
        };
        assert!(!e.user_message().contains("Pdfium"));
        assert!(e.user_message().contains("encrypted or invalid"));
        assert_eq!(DeblankError::EmptyInput.user_message(), "Uploaded file is empty.");
        assert_eq!(
            DeblankError::document_failure("x").user_message(),
            "Failed to process PDF."
        );
    }

    #[test]
    fn input_errors_are_classified() {
        assert!(DeblankError::EmptyInput.is_input_error());
        assert!(DeblankError::page_failure(0, "x").is_input_error());
        assert!(!DeblankError::InvalidConfig("x".into()).is_input_error());
        assert!(!DeblankError::EngineUnavailable("x".into()).is_input_error());
    }
}
