//! pdfium-render implementation of the [`crate::document`] model.
//!
//! Everything in here is blocking. One pdfium instance serves the whole
//! process ([`shared_pdfium`]); documents and pages stay on the thread that
//! opened them. [`crate::clean::clean_bytes_async`] moves the work onto
//! `spawn_blocking`.

pub mod engine;
pub mod pdfium;

pub use engine::shared_pdfium;
pub use pdfium::{PdfiumDocument, PdfiumPage};
