//! Structural content inspection: authored objects visible without rendering.
//!
//! Checks run cheapest first and stop at the first hit. Text extraction and
//! the object walk are the expensive ones, so annotations and links go first.

use crate::document::Page;
use crate::error::DeblankError;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// The first kind of structural content found on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralSignal {
    Annotation,
    Link,
    Text,
    Image,
    ColoredDrawing,
}

impl StructuralSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructuralSignal::Annotation => "annotation",
            StructuralSignal::Link => "link",
            StructuralSignal::Text => "text",
            StructuralSignal::Image => "image",
            StructuralSignal::ColoredDrawing => "colored drawing",
        }
    }
}

/// Find the first structural signal on `page`, or `None` if there is none.
///
/// A drawing counts only when its stroke or fill has a channel below
/// `near_white`; uncoloured strokes and fills are white.
pub fn find_structural_content<P: Page + ?Sized>(
    page: &P,
    near_white: f32,
) -> Result<Option<StructuralSignal>, DeblankError> {
    if page.has_annotations()? {
        return Ok(Some(StructuralSignal::Annotation));
    }
    if page.has_links()? {
        return Ok(Some(StructuralSignal::Link));
    }
    let words = page.words()?;
    if !words.is_empty() {
        trace!("{} words, first {:?}", words.len(), words[0]);
        return Ok(Some(StructuralSignal::Text));
    }
    if page.image_count()? > 0 {
        return Ok(Some(StructuralSignal::Image));
    }
    if page.drawings()?.iter().any(|d| d.is_colored(near_white)) {
        return Ok(Some(StructuralSignal::ColoredDrawing));
    }
    Ok(None)
}

/// `true` if `page` carries any structural content.
pub fn has_structural_content<P: Page + ?Sized>(
    page: &P,
    near_white: f32,
) -> Result<bool, DeblankError> {
    Ok(find_structural_content(page, near_white)?.is_some())
}
