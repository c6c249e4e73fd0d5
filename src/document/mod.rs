//! Read-only document model the classifier works against.
//!
//! The classifier never touches pdfium types directly. It sees a
//! [`Document`] (ordered, zero-indexed pages plus a copy-on-select export)
//! and a [`Page`] (annotations, links, words, images, drawings, and a
//! grayscale rendering). [`crate::backend`] implements both for real PDFs;
//! [`memory`] implements them for fixtures and tests.

pub mod memory;

use crate::error::DeblankError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// An RGB colour with channels normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// `true` when every channel is at or above `level`.
    pub fn is_near_white(&self, level: f32) -> bool {
        self.r >= level && self.g >= level && self.b >= level
    }
}

/// One vector drawing operation on a page.
///
/// `None` means the operation has no stroke (or no fill); it is treated as
/// white.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Drawing {
    pub stroke: Option<Rgb>,
    pub fill: Option<Rgb>,
}

impl Drawing {
    pub fn stroked(color: Rgb) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
        }
    }

    pub fn filled(color: Rgb) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
        }
    }

    /// `true` when the stroke or the fill has a channel below `near_white`.
    pub fn is_colored(&self, near_white: f32) -> bool {
        let stroke = self.stroke.unwrap_or(Rgb::WHITE);
        let fill = self.fill.unwrap_or(Rgb::WHITE);
        !stroke.is_near_white(near_white) || !fill.is_near_white(near_white)
    }
}

/// Read-only view of one page.
///
/// Every query may fail; a failure aborts the whole document.
pub trait Page {
    /// At least one annotation is attached to the page.
    fn has_annotations(&self) -> Result<bool, DeblankError>;

    /// At least one link object is on the page.
    fn has_links(&self) -> Result<bool, DeblankError>;

    /// Whitespace-delimited text tokens, in extraction order.
    fn words(&self) -> Result<Vec<String>, DeblankError>;

    /// Number of embedded raster images.
    fn image_count(&self) -> Result<usize, DeblankError>;

    /// Vector drawing operations with their colours.
    fn drawings(&self) -> Result<Vec<Drawing>, DeblankError>;

    /// Render the page as 8-bit grayscale at `scale` (1.0 = one pixel per point).
    fn render_gray(&self, scale: f32) -> Result<GrayImage, DeblankError>;
}

/// An ordered, read-only sequence of pages.
pub trait Document {
    type Page<'p>: Page
    where
        Self: 'p;

    fn page_count(&self) -> usize;

    /// Load the page at zero-based `index`.
    fn page(&self, index: usize) -> Result<Self::Page<'_>, DeblankError>;

    /// Build a new document from copies of `indices` (in that order) and
    /// serialise it. The receiver is not modified.
    fn extract_pages(&self, indices: &[usize]) -> Result<Vec<u8>, DeblankError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_normalises() {
        let c = Rgb::from_u8(255, 0, 51);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn missing_colours_are_white() {
        assert!(!Drawing::default().is_colored(0.995));
    }

    #[test]
    fn any_dark_channel_colours_a_drawing() {
        assert!(Drawing::stroked(Rgb::new(1.0, 1.0, 0.99)).is_colored(0.995));
        assert!(Drawing::filled(Rgb::new(0.5, 1.0, 1.0)).is_colored(0.995));
        assert!(!Drawing::filled(Rgb::new(0.995, 0.999, 1.0)).is_colored(0.995));
    }

    #[test]
    fn white_stroke_with_dark_fill_is_colored() {
        let d = Drawing {
            stroke: Some(Rgb::WHITE),
            fill: Some(Rgb::BLACK),
        };
        assert!(d.is_colored(0.995));
    }
}
