//! Blank-page classification.
//!
//! ```text
//! page ──▶ structure ──(nothing found)──▶ raster ──▶ verdict
//!              │
//!              └──(content found)──▶ not blank
//! ```
//!
//! Structural content is authoritative: a page with a single word, link or
//! coloured line is kept even if it renders almost white. Rasterisation runs
//! only when structure finds nothing, which skips the expensive step on
//! nearly every contentful page.

pub mod raster;
pub mod structure;

use crate::config::DeblankConfig;
use crate::document::Page;
use crate::error::DeblankError;
use raster::RasterParams;
use serde::{Deserialize, Serialize};
pub use structure::StructuralSignal;

/// Why a page was judged blank or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlankReason {
    /// Structural content was found; the page was not rendered.
    Structural { signal: StructuralSignal },
    /// No structure; the rendered page has more ink than allowed.
    Ink { dark_ratio: f64 },
    /// No structure; the rendered page is (near-)white.
    NearWhite { dark_ratio: f64 },
    /// No structure and rasterisation is disabled.
    NoStructure,
}

/// Verdict for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageVerdict {
    /// 1-indexed page number.
    pub page_num: usize,
    pub blank: bool,
    pub reason: BlankReason,
}

/// Classify `page` and explain the decision.
pub fn classify_page<P: Page + ?Sized>(
    page: &P,
    config: &DeblankConfig,
) -> Result<(bool, BlankReason), DeblankError> {
    if let Some(signal) = structure::find_structural_content(page, config.near_white)? {
        return Ok((false, BlankReason::Structural { signal }));
    }
    if config.skip_raster {
        return Ok((true, BlankReason::NoStructure));
    }

    let params = RasterParams::from(config);
    let coverage = raster::measure(page, &params)?;
    let dark_ratio = coverage.ratio();
    if coverage.is_blank(params.max_dark_ratio) {
        Ok((true, BlankReason::NearWhite { dark_ratio }))
    } else {
        Ok((false, BlankReason::Ink { dark_ratio }))
    }
}

/// `true` if `page` is blank under `config`.
pub fn is_blank<P: Page + ?Sized>(page: &P, config: &DeblankConfig) -> Result<bool, DeblankError> {
    Ok(classify_page(page, config)?.0)
}
