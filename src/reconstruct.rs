//! Document reconstruction: classify every page, copy the survivors.
//!
//! Pages are classified in order and the first failure aborts the run, so a
//! half-built document never escapes. Survivors are copied into a fresh
//! document in their original relative order; the source is only read.

use crate::classify::{self, PageVerdict};
use crate::config::DeblankConfig;
use crate::document::Document;
use crate::error::DeblankError;
use tracing::{debug, info};

/// What reconstruction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebuilt {
    /// Some pages were removed; serialised filtered document.
    Filtered(Vec<u8>),
    /// No page was blank. Nothing was copied.
    NothingRemoved,
    /// Every page was blank, or the document had no pages.
    NothingKept,
}

/// Classify every page of `doc` in order.
///
/// Fires the progress callback in `config` for each page.
pub fn classify_document<D: Document + ?Sized>(
    doc: &D,
    config: &DeblankConfig,
) -> Result<Vec<PageVerdict>, DeblankError> {
    let total = doc.page_count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_start(total);
    }

    let mut verdicts = Vec::with_capacity(total);
    for index in 0..total {
        let page = doc.page(index)?;
        let (blank, reason) = classify::classify_page(&page, config)?;
        debug!("Page {}/{}: blank={} ({:?})", index + 1, total, blank, reason);

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_classified(index + 1, total, blank);
        }
        verdicts.push(PageVerdict {
            page_num: index + 1,
            blank,
            reason,
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(total, verdicts.iter().filter(|v| !v.blank).count());
    }
    Ok(verdicts)
}

/// Zero-based indices of the pages to keep, in order.
pub fn kept_indices(verdicts: &[PageVerdict]) -> Vec<usize> {
    verdicts
        .iter()
        .filter(|v| !v.blank)
        .map(|v| v.page_num - 1)
        .collect()
}

/// Copy the non-blank pages of `doc` into a new serialised document.
pub fn rebuild<D: Document + ?Sized>(
    doc: &D,
    verdicts: &[PageVerdict],
) -> Result<Rebuilt, DeblankError> {
    let kept = kept_indices(verdicts);
    if kept.is_empty() {
        return Ok(Rebuilt::NothingKept);
    }
    if kept.len() == verdicts.len() {
        return Ok(Rebuilt::NothingRemoved);
    }

    let bytes = doc.extract_pages(&kept)?;
    info!(
        "Rebuilt document: kept {}/{} pages ({} bytes)",
        kept.len(),
        verdicts.len(),
        bytes.len()
    );
    // An empty serialisation means nothing usable was produced.
    if bytes.is_empty() {
        return Ok(Rebuilt::NothingKept);
    }
    Ok(Rebuilt::Filtered(bytes))
}

/// Classify and rebuild in one step.
pub fn strip_blank_pages<D: Document + ?Sized>(
    doc: &D,
    config: &DeblankConfig,
) -> Result<(Rebuilt, Vec<PageVerdict>), DeblankError> {
    let verdicts = classify_document(doc, config)?;
    let rebuilt = rebuild(doc, &verdicts)?;
    Ok((rebuilt, verdicts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, MemoryPage};
    use crate::progress::DeblankProgressCallback;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn ink(label: &str) -> MemoryPage {
        MemoryPage::blank(100, 100)
            .labeled(label)
            .with_dark_block(20, 20, 30, 30)
    }

    fn white(label: &str) -> MemoryPage {
        MemoryPage::blank(100, 100).labeled(label)
    }

    #[test]
    fn keeps_contentful_pages_in_order() {
        let doc = MemoryDocument::new(vec![
            white("b1"),
            ink("p1"),
            white("b2"),
            MemoryPage::default().labeled("p2").with_text("hello"),
            white("b3"),
            ink("p3"),
        ]);
        let (rebuilt, verdicts) = strip_blank_pages(&doc, &DeblankConfig::default()).unwrap();
        assert_eq!(verdicts.len(), 6);
        let Rebuilt::Filtered(bytes) = rebuilt else {
            panic!("expected a filtered document, got {rebuilt:?}");
        };
        let out = MemoryDocument::from_bytes(&bytes).unwrap();
        assert_eq!(out.labels(), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn all_blank_keeps_nothing() {
        let doc = MemoryDocument::new(vec![white("a"), white("b")]);
        let (rebuilt, _) = strip_blank_pages(&doc, &DeblankConfig::default()).unwrap();
        assert_eq!(rebuilt, Rebuilt::NothingKept);
    }

    #[test]
    fn zero_pages_keeps_nothing() {
        let (rebuilt, verdicts) =
            strip_blank_pages(&MemoryDocument::default(), &DeblankConfig::default()).unwrap();
        assert!(verdicts.is_empty());
        assert_eq!(rebuilt, Rebuilt::NothingKept);
    }

    #[test]
    fn no_blank_pages_copies_nothing() {
        let doc = MemoryDocument::new(vec![ink("a"), ink("b")]);
        let (rebuilt, _) = strip_blank_pages(&doc, &DeblankConfig::default()).unwrap();
        assert_eq!(rebuilt, Rebuilt::NothingRemoved);
    }

    #[test]
    fn one_bad_page_aborts_the_document() {
        let doc = MemoryDocument::new(vec![ink("a"), white("b").corrupted(), ink("c")]);
        let err = strip_blank_pages(&doc, &DeblankConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            DeblankError::ProcessingFailure { page: Some(2), .. }
        ));
    }

    #[test]
    fn progress_events_follow_page_order() {
        #[derive(Default)]
        struct Recorder {
            next_expected: AtomicUsize,
            blanks: AtomicUsize,
            kept: AtomicUsize,
        }
        impl DeblankProgressCallback for Recorder {
            fn on_start(&self, _total: usize) {
                self.next_expected.store(1, Ordering::SeqCst);
            }
            fn on_page_classified(&self, page_num: usize, _total: usize, blank: bool) {
                assert_eq!(self.next_expected.fetch_add(1, Ordering::SeqCst), page_num);
                if blank {
                    self.blanks.fetch_add(1, Ordering::SeqCst);
                }
            }
            fn on_complete(&self, _total: usize, kept: usize) {
                self.kept.store(kept, Ordering::SeqCst);
            }
        }

        let recorder = Arc::new(Recorder::default());
        let config = DeblankConfig::builder()
            .progress_callback(recorder.clone())
            .build()
            .unwrap();
        let doc = MemoryDocument::new(vec![ink("a"), white("b"), white("c"), ink("d")]);
        classify_document(&doc, &config).unwrap();

        assert_eq!(recorder.blanks.load(Ordering::SeqCst), 2);
        assert_eq!(recorder.kept.load(Ordering::SeqCst), 2);
    }
}
