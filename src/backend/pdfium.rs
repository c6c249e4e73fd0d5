//! [`Document`] and [`Page`] over pdfium-render.

use crate::document::{Document, Drawing, Page, Rgb};
use crate::error::DeblankError;
use image::GrayImage;
use pdfium_render::prelude::*;
use std::cell::OnceCell;
use tracing::{debug, info};

/// A PDF opened read-only from memory.
///
/// Dropping it closes the underlying pdfium document.
pub struct PdfiumDocument<'a> {
    pdfium: &'a Pdfium,
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `bytes` as a PDF. Encrypted and malformed files are rejected.
    pub fn open(pdfium: &'a Pdfium, bytes: &'a [u8]) -> Result<Self, DeblankError> {
        let document = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| DeblankError::InvalidOrEncryptedDocument {
                detail: format!("{:?}", e),
            })?;
        info!("PDF loaded: {} pages", document.pages().len());
        Ok(Self { pdfium, document })
    }
}

impl Document for PdfiumDocument<'_> {
    type Page<'p>
        = PdfiumPage<'p>
    where
        Self: 'p;

    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<PdfiumPage<'_>, DeblankError> {
        let idx = u16::try_from(index)
            .map_err(|_| DeblankError::page_failure(index, "page index exceeds pdfium limits"))?;
        let page = self
            .document
            .pages()
            .get(idx)
            .map_err(|e| DeblankError::page_failure(index, format!("{:?}", e)))?;
        Ok(PdfiumPage {
            page,
            index,
            scan: OnceCell::new(),
        })
    }

    fn extract_pages(&self, indices: &[usize]) -> Result<Vec<u8>, DeblankError> {
        let mut output = self
            .pdfium
            .create_new_pdf()
            .map_err(|e| DeblankError::document_failure(format!("{:?}", e)))?;

        for (dest, &src) in indices.iter().enumerate() {
            let (src_idx, dest_idx) = match (u16::try_from(src), u16::try_from(dest)) {
                (Ok(s), Ok(d)) => (s, d),
                _ => {
                    return Err(DeblankError::page_failure(
                        src,
                        "page index exceeds pdfium limits",
                    ))
                }
            };
            output
                .pages_mut()
                .copy_page_from_document(&self.document, src_idx, dest_idx)
                .map_err(|e| DeblankError::page_failure(src, format!("copy failed: {:?}", e)))?;
        }

        let bytes = output
            .save_to_bytes()
            .map_err(|e| DeblankError::document_failure(format!("save failed: {:?}", e)))?;
        debug!("Serialised {} pages → {} bytes", indices.len(), bytes.len());
        Ok(bytes)
    }
}

/// One page of a [`PdfiumDocument`].
pub struct PdfiumPage<'a> {
    page: PdfPage<'a>,
    index: usize,
    /// Object walk shared by `image_count` and `drawings`.
    scan: OnceCell<ObjectScan>,
}

/// Images and drawings gathered in one walk over the page objects.
#[derive(Default)]
struct ObjectScan {
    images: usize,
    drawings: Vec<Drawing>,
}

impl PdfiumPage<'_> {
    fn fail(&self, e: PdfiumError) -> DeblankError {
        DeblankError::page_failure(self.index, format!("{:?}", e))
    }

    /// Walk the page objects once; later calls reuse the result.
    fn scan_objects(&self) -> Result<&ObjectScan, DeblankError> {
        if let Some(scan) = self.scan.get() {
            return Ok(scan);
        }
        let mut scan = ObjectScan::default();
        for object in self.page.objects().iter() {
            visit_object(&object, &mut scan).map_err(|e| self.fail(e))?;
        }
        Ok(self.scan.get_or_init(|| scan))
    }
}

/// Record `object`, descending into form XObjects.
fn visit_object(object: &PdfPageObject, scan: &mut ObjectScan) -> Result<(), PdfiumError> {
    match object {
        PdfPageObject::Image(_) => scan.images += 1,
        PdfPageObject::Path(path) => scan.drawings.push(path_drawing(path)?),
        PdfPageObject::XObjectForm(form) => {
            for i in 0..form.len() {
                visit_object(&form.get(i)?, scan)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Stroke colour only if the path is stroked; fill colour only if it is filled.
fn path_drawing(path: &PdfPagePathObject) -> Result<Drawing, PdfiumError> {
    let stroke = if path.is_stroked()? {
        Some(to_rgb(path.stroke_color()?))
    } else {
        None
    };
    let fill = if matches!(path.fill_mode()?, PdfPathFillMode::None) {
        None
    } else {
        Some(to_rgb(path.fill_color()?))
    };
    Ok(Drawing { stroke, fill })
}

fn to_rgb(c: PdfColor) -> Rgb {
    Rgb::from_u8(c.red(), c.green(), c.blue())
}

impl Page for PdfiumPage<'_> {
    fn has_annotations(&self) -> Result<bool, DeblankError> {
        Ok(self.page.annotations().len() > 0)
    }

    fn has_links(&self) -> Result<bool, DeblankError> {
        Ok(self.page.links().len() > 0)
    }

    fn words(&self) -> Result<Vec<String>, DeblankError> {
        let text = self.page.text().map_err(|e| self.fail(e))?;
        Ok(text.all().split_whitespace().map(str::to_owned).collect())
    }

    fn image_count(&self) -> Result<usize, DeblankError> {
        Ok(self.scan_objects()?.images)
    }

    fn drawings(&self) -> Result<Vec<Drawing>, DeblankError> {
        Ok(self.scan_objects()?.drawings.clone())
    }

    fn render_gray(&self, scale: f32) -> Result<GrayImage, DeblankError> {
        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = self
            .page
            .render_with_config(&render_config)
            .map_err(|e| self.fail(e))?;
        let gray = bitmap.as_image().to_luma8();
        debug!(
            "Rendered page {} → {}x{} px",
            self.index + 1,
            gray.width(),
            gray.height()
        );
        Ok(gray)
    }
}
