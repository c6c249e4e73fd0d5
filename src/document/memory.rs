//! In-memory [`Document`] backed by a small JSON format.
//!
//! Used for fixtures, tests, and for exercising the pipeline on machines
//! without a pdfium library. A page's raster is stored pre-rendered: a
//! background intensity plus a list of marked pixels, so a 1000×1000 page
//! costs a few bytes. `render_gray` returns it unchanged whatever the scale.

use super::{Document, Drawing, Page};
use crate::error::DeblankError;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

const DEFAULT_SIDE: u32 = 100;

/// One pixel drawn over the raster background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub x: u32,
    pub y: u32,
    pub value: u8,
}

/// A page held entirely in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    /// Free-form label, handy for checking which pages survived.
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub annotations: usize,
    #[serde(default)]
    pub links: usize,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: usize,
    #[serde(default)]
    pub drawings: Vec<Drawing>,
    pub width: u32,
    pub height: u32,
    pub background: u8,
    #[serde(default)]
    pub marks: Vec<Mark>,
    /// Every query on this page fails with a processing error.
    #[serde(default)]
    pub corrupt: bool,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::blank(DEFAULT_SIDE, DEFAULT_SIDE)
    }
}

impl MemoryPage {
    /// A white page with no structural content.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            label: String::new(),
            annotations: 0,
            links: 0,
            text: String::new(),
            images: 0,
            drawings: Vec::new(),
            width,
            height,
            background: 255,
            marks: Vec::new(),
            corrupt: false,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_annotations(mut self, n: usize) -> Self {
        self.annotations = n;
        self
    }

    pub fn with_links(mut self, n: usize) -> Self {
        self.links = n;
        self
    }

    pub fn with_images(mut self, n: usize) -> Self {
        self.images = n;
        self
    }

    pub fn with_drawing(mut self, drawing: Drawing) -> Self {
        self.drawings.push(drawing);
        self
    }

    pub fn with_background(mut self, value: u8) -> Self {
        self.background = value;
        self
    }

    /// Set one pixel. Out-of-bounds marks are ignored when rendering.
    pub fn with_mark(mut self, x: u32, y: u32, value: u8) -> Self {
        self.marks.push(Mark { x, y, value });
        self
    }

    /// Fill a `w`×`h` block at (`x`, `y`) with black.
    pub fn with_dark_block(mut self, x: u32, y: u32, w: u32, h: u32) -> Self {
        for yy in y..y + h {
            for xx in x..x + w {
                self.marks.push(Mark {
                    x: xx,
                    y: yy,
                    value: 0,
                });
            }
        }
        self
    }

    pub fn corrupted(mut self) -> Self {
        self.corrupt = true;
        self
    }
}

/// A document held entirely in memory.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }

    /// Parse a document previously produced by [`MemoryDocument::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DeblankError> {
        serde_json::from_slice(bytes).map_err(|e| DeblankError::InvalidOrEncryptedDocument {
            detail: e.to_string(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DeblankError> {
        serde_json::to_vec(self).map_err(|e| DeblankError::document_failure(e.to_string()))
    }

    /// Labels of all pages, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.label.as_str()).collect()
    }
}

/// A borrowed page together with its position, for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct MemoryPageRef<'a> {
    page: &'a MemoryPage,
    index: usize,
}

impl MemoryPageRef<'_> {
    fn check(&self) -> Result<(), DeblankError> {
        if self.page.corrupt {
            Err(DeblankError::page_failure(self.index, "corrupt page content"))
        } else {
            Ok(())
        }
    }
}

impl Page for MemoryPageRef<'_> {
    fn has_annotations(&self) -> Result<bool, DeblankError> {
        self.check()?;
        Ok(self.page.annotations > 0)
    }

    fn has_links(&self) -> Result<bool, DeblankError> {
        self.check()?;
        Ok(self.page.links > 0)
    }

    fn words(&self) -> Result<Vec<String>, DeblankError> {
        self.check()?;
        Ok(self.page.text.split_whitespace().map(str::to_owned).collect())
    }

    fn image_count(&self) -> Result<usize, DeblankError> {
        self.check()?;
        Ok(self.page.images)
    }

    fn drawings(&self) -> Result<Vec<Drawing>, DeblankError> {
        self.check()?;
        Ok(self.page.drawings.clone())
    }

    fn render_gray(&self, _scale: f32) -> Result<GrayImage, DeblankError> {
        self.check()?;
        let mut img = GrayImage::from_pixel(
            self.page.width,
            self.page.height,
            Luma([self.page.background]),
        );
        for m in &self.page.marks {
            if m.x < img.width() && m.y < img.height() {
                img.put_pixel(m.x, m.y, Luma([m.value]));
            }
        }
        Ok(img)
    }
}

impl Document for MemoryDocument {
    type Page<'p> = MemoryPageRef<'p>;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<MemoryPageRef<'_>, DeblankError> {
        let page = self.pages.get(index).ok_or_else(|| {
            DeblankError::page_failure(index, format!("page index out of range ({})", self.pages.len()))
        })?;
        Ok(MemoryPageRef { page, index })
    }

    fn extract_pages(&self, indices: &[usize]) -> Result<Vec<u8>, DeblankError> {
        let pages = indices
            .iter()
            .map(|&i| {
                self.pages
                    .get(i)
                    .cloned()
                    .ok_or_else(|| DeblankError::page_failure(i, "cannot copy missing page"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        MemoryDocument { pages }.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_what_it_writes() {
        let doc = MemoryDocument::new(vec![
            MemoryPage::default().labeled("a").with_text("hello"),
            MemoryPage::blank(20, 30).labeled("b"),
        ]);
        let bytes = doc.to_bytes().unwrap();
        assert_eq!(MemoryDocument::from_bytes(&bytes).unwrap(), doc);
    }

    #[test]
    fn garbage_is_invalid_document() {
        let err = MemoryDocument::from_bytes(b"%PDF-1.7 not json").unwrap_err();
        assert!(matches!(err, DeblankError::InvalidOrEncryptedDocument { .. }));
    }

    #[test]
    fn render_applies_marks_and_ignores_out_of_bounds() {
        let doc = MemoryDocument::new(vec![MemoryPage::blank(4, 3)
            .with_mark(1, 2, 10)
            .with_mark(40, 40, 0)]);
        let img = doc.page(0).unwrap().render_gray(2.0).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert_eq!(img.get_pixel(1, 2).0[0], 10);
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn corrupt_page_reports_its_number() {
        let doc = MemoryDocument::new(vec![MemoryPage::default(), MemoryPage::default().corrupted()]);
        let err = doc.page(1).unwrap().words().unwrap_err();
        assert!(err.to_string().contains("page 2"), "got: {err}");
    }

    #[test]
    fn extract_keeps_requested_order() {
        let doc = MemoryDocument::new(vec![
            MemoryPage::default().labeled("a"),
            MemoryPage::default().labeled("b"),
            MemoryPage::default().labeled("c"),
        ]);
        let out = MemoryDocument::from_bytes(&doc.extract_pages(&[0, 2]).unwrap()).unwrap();
        assert_eq!(out.labels(), vec!["a", "c"]);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn out_of_range_page_is_processing_failure() {
        let doc = MemoryDocument::default();
        assert!(matches!(
            doc.page(0),
            Err(DeblankError::ProcessingFailure { page: Some(1), .. })
        ));
    }
}
