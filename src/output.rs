//! Result types returned by the cleaning entry points.

use crate::classify::PageVerdict;
use serde::{Deserialize, Serialize};

/// How the returned bytes relate to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// At least one blank page was removed; the bytes are a new document.
    Cleaned,
    /// No page was blank; the bytes are the input, untouched.
    Unchanged,
    /// Every page was blank (or there were none); the bytes are the input,
    /// since an empty document is never useful.
    FallbackToOriginal,
}

/// Page counts and timing for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanStats {
    pub total_pages: usize,
    pub kept_pages: usize,
    pub removed_pages: usize,
    pub duration_ms: u64,
}

/// Per-page verdicts plus totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanReport {
    pub pages: Vec<PageVerdict>,
    pub stats: CleanStats,
}

impl CleanReport {
    pub fn from_verdicts(pages: Vec<PageVerdict>, duration_ms: u64) -> Self {
        let total_pages = pages.len();
        let kept_pages = pages.iter().filter(|v| !v.blank).count();
        Self {
            pages,
            stats: CleanStats {
                total_pages,
                kept_pages,
                removed_pages: total_pages - kept_pages,
                duration_ms,
            },
        }
    }

    /// 1-indexed numbers of the pages judged blank.
    pub fn blank_pages(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|v| v.blank)
            .map(|v| v.page_num)
            .collect()
    }
}

/// Output of a cleaning run.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    /// The document to hand back. Never empty for a non-empty input.
    pub bytes: Vec<u8>,
    pub outcome: Outcome,
    pub report: CleanReport,
}
