//! Raster density analysis: render the page and measure ink coverage.
//!
//! Scans of empty sheets are never perfectly white, so a page is blank when
//! its share of dark pixels stays at or below a small ratio rather than at
//! zero. A border of `margin_px` is cropped first to drop scanner-edge
//! shadows; pages too small to crop are measured whole.

use crate::config::DeblankConfig;
use crate::document::Page;
use crate::error::DeblankError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Parameters of the density test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterParams {
    pub scale: f32,
    pub dark_threshold: u8,
    pub max_dark_ratio: f64,
    pub margin_px: u32,
}

impl Default for RasterParams {
    fn default() -> Self {
        Self::from(&DeblankConfig::default())
    }
}

impl From<&DeblankConfig> for RasterParams {
    fn from(c: &DeblankConfig) -> Self {
        Self {
            scale: c.scale,
            dark_threshold: c.dark_threshold,
            max_dark_ratio: c.max_dark_ratio,
            margin_px: c.margin_px,
        }
    }
}

/// Dark-pixel count of a (possibly cropped) rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkCoverage {
    pub dark: u64,
    pub total: u64,
    /// Whether the margin was cropped before counting.
    pub cropped: bool,
}

impl InkCoverage {
    /// `dark / max(total, 1)`.
    pub fn ratio(&self) -> f64 {
        self.dark as f64 / self.total.max(1) as f64
    }

    /// Blank iff the ratio is at or below `max_dark_ratio`.
    pub fn is_blank(&self, max_dark_ratio: f64) -> bool {
        self.ratio() <= max_dark_ratio
    }
}

/// Count pixels strictly darker than `dark_threshold`, excluding a
/// `margin_px` border when both dimensions exceed `2 * margin_px`.
pub fn ink_coverage(img: &GrayImage, dark_threshold: u8, margin_px: u32) -> InkCoverage {
    let (w, h) = img.dimensions();
    let m = margin_px;
    let cropped = m > 0 && w > m.saturating_mul(2) && h > m.saturating_mul(2);
    let (x0, y0, x1, y1) = if cropped {
        (m, m, w - m, h - m)
    } else {
        (0, 0, w, h)
    };

    let row_len = w as usize;
    let samples = img.as_raw();
    let mut dark = 0u64;
    for y in y0..y1 {
        let start = y as usize * row_len;
        let row = &samples[start + x0 as usize..start + x1 as usize];
        dark += row.iter().filter(|&&v| v < dark_threshold).count() as u64;
    }

    InkCoverage {
        dark,
        total: (x1 - x0) as u64 * (y1 - y0) as u64,
        cropped,
    }
}

/// Render `page` and measure its ink coverage.
pub fn measure<P: Page + ?Sized>(page: &P, params: &RasterParams) -> Result<InkCoverage, DeblankError> {
    let img = page.render_gray(params.scale)?;
    Ok(ink_coverage(&img, params.dark_threshold, params.margin_px))
}

/// `true` if the rendered page is (near-)white.
pub fn raster_looks_blank<P: Page + ?Sized>(
    page: &P,
    params: &RasterParams,
) -> Result<bool, DeblankError> {
    Ok(measure(page, params)?.is_blank(params.max_dark_ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, MemoryPage};
    use crate::document::Document;
    use image::Luma;

    /// A white square whose interior (after a 6 px crop) is exactly 1000×1000.
    fn page_with_dark_pixels(n: u32) -> GrayImage {
        let mut img = GrayImage::from_pixel(1012, 1012, Luma([255]));
        for i in 0..n {
            img.put_pixel(6 + i % 1000, 6 + i / 1000, Luma([0]));
        }
        img
    }

    #[test]
    fn ratio_boundary_is_inclusive() {
        let at = ink_coverage(&page_with_dark_pixels(800), 252, 6);
        assert_eq!(at.total, 1_000_000);
        assert_eq!(at.ratio(), 0.0008);
        assert!(at.is_blank(0.0008));

        let above = ink_coverage(&page_with_dark_pixels(810), 252, 6);
        assert!(!above.is_blank(0.0008));
    }

    #[test]
    fn margin_pixels_are_not_counted() {
        let mut img = GrayImage::from_pixel(100, 100, Luma([255]));
        for x in 0..100 {
            img.put_pixel(x, 0, Luma([0]));
            img.put_pixel(x, 99, Luma([0]));
        }
        let cov = ink_coverage(&img, 252, 6);
        assert!(cov.cropped);
        assert_eq!(cov.dark, 0);
        assert_eq!(cov.total, 88 * 88);
    }

    #[test]
    fn threshold_is_strict() {
        let img = GrayImage::from_pixel(10, 10, Luma([252]));
        assert_eq!(ink_coverage(&img, 252, 0).dark, 0);
        let img = GrayImage::from_pixel(10, 10, Luma([251]));
        assert_eq!(ink_coverage(&img, 252, 0).dark, 100);
    }

    #[test]
    fn small_pages_are_measured_uncropped() {
        // 12 is not > 2 * 6, so no crop.
        let img = GrayImage::from_pixel(12, 40, Luma([0]));
        let cov = ink_coverage(&img, 252, 6);
        assert!(!cov.cropped);
        assert_eq!(cov.total, 480);
        assert_eq!(cov.dark, 480);

        let tiny = GrayImage::from_pixel(1, 1, Luma([255]));
        assert!(ink_coverage(&tiny, 252, 6).is_blank(0.0008));
    }

    #[test]
    fn empty_render_counts_as_blank() {
        let img = GrayImage::new(0, 0);
        let cov = ink_coverage(&img, 252, 6);
        assert_eq!(cov.total, 0);
        assert_eq!(cov.ratio(), 0.0);
        assert!(cov.is_blank(0.0));
    }

    #[test]
    fn raster_blank_through_page() {
        let doc = MemoryDocument::new(vec![
            MemoryPage::blank(200, 200),
            MemoryPage::blank(200, 200).with_dark_block(50, 50, 10, 10),
        ]);
        let params = RasterParams::default();
        assert!(raster_looks_blank(&doc.page(0).unwrap(), &params).unwrap());
        assert!(!raster_looks_blank(&doc.page(1).unwrap(), &params).unwrap());
    }
}
