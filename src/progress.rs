//! Progress-callback trait for per-page classification events.
//!
//! Inject an [`Arc<dyn DeblankProgressCallback>`] via
//! [`crate::config::DeblankConfigBuilder::progress_callback`] to receive an
//! event as each page is judged. The CLI draws a progress bar from these;
//! a service might forward them to a job table.
//!
//! # Example
//!
//! ```rust
//! use edgequake_deblank::{DeblankConfig, DeblankProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct BlankCounter {
//!     blanks: AtomicUsize,
//! }
//!
//! impl DeblankProgressCallback for BlankCounter {
//!     fn on_page_classified(&self, _page_num: usize, _total_pages: usize, blank: bool) {
//!         if blank {
//!             self.blanks.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(BlankCounter { blanks: AtomicUsize::new(0) });
//! let config = DeblankConfig::builder()
//!     .progress_callback(counter as Arc<dyn DeblankProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the reconstructor as it classifies each page.
///
/// Implementations must be `Send + Sync` so a config can be shared with a
/// `spawn_blocking` task. All methods default to no-ops.
pub trait DeblankProgressCallback: Send + Sync {
    /// Called once after the document opened, before any page is classified.
    fn on_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's verdict is known.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: total pages in the document
    /// * `blank`      : `true` when the page will be removed
    fn on_page_classified(&self, page_num: usize, total_pages: usize, blank: bool) {
        let _ = (page_num, total_pages, blank);
    }

    /// Called once after every page has been classified.
    ///
    /// Not called when classification aborts with an error.
    fn on_complete(&self, total_pages: usize, kept_pages: usize) {
        let _ = (total_pages, kept_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl DeblankProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::DeblankConfig`].
pub type ProgressCallback = Arc<dyn DeblankProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        classified: AtomicUsize,
        blanks: AtomicUsize,
        kept: AtomicUsize,
    }

    impl DeblankProgressCallback for TrackingCallback {
        fn on_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_classified(&self, _page_num: usize, _total_pages: usize, blank: bool) {
            self.classified.fetch_add(1, Ordering::SeqCst);
            if blank {
                self.blanks.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn on_complete(&self, _total_pages: usize, kept_pages: usize) {
            self.kept.store(kept_pages, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_start(3);
        cb.on_page_classified(1, 3, true);
        cb.on_complete(3, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_start(3);
        tracker.on_page_classified(1, 3, false);
        tracker.on_page_classified(2, 3, true);
        tracker.on_page_classified(3, 3, false);
        tracker.on_complete(3, 2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.classified.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.blanks.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.kept.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn DeblankProgressCallback>();
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_start(1);
    }
}
