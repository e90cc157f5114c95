//! PDF composition: ordered captures into one fixed-geometry document

use crate::{Error, RenderedPage, Result, PAGE_HEIGHT_IN, PAGE_WIDTH_IN, RENDER_DPI};
use log::debug;
use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, XObjectTransform};

const MM_PER_INCH: f32 = 25.4;

/// Compose the ordered captures into a single PDF byte buffer.
///
/// One landscape page per capture, sized exactly 20in x 11.25in. Each PNG is
/// drawn at the page origin with the 96-DPI conversion already baked into the
/// page size, so the 1920x1080 raster fills the page at native resolution
/// with no resampling. Page count always equals `pages.len()`.
///
/// Precondition: at least one rendered page. The pipeline validates input
/// before rendering, so an empty sequence here is a caller bug and fails
/// with [`Error::Assembly`].
pub fn assemble(title: &str, pages: &[RenderedPage]) -> Result<Vec<u8>> {
    let doc = build_document(title, pages)?;
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        debug!("pdf writer warning: {:?}", warning);
    }
    debug!(
        "assembled {} page(s), {:.2}MB",
        pages.len(),
        bytes.len() as f64 / 1024.0 / 1024.0
    );
    Ok(bytes)
}

/// Build the in-memory document; split out so tests can assert page count
/// and structure without parsing the serialized bytes.
fn build_document(title: &str, pages: &[RenderedPage]) -> Result<PdfDocument> {
    if pages.is_empty() {
        return Err(Error::Assembly(
            "cannot assemble a document from zero rendered pages".to_string(),
        ));
    }

    let page_width = Mm(PAGE_WIDTH_IN * MM_PER_INCH);
    let page_height = Mm(PAGE_HEIGHT_IN * MM_PER_INCH);

    let mut doc = PdfDocument::new(title);
    let mut pdf_pages = Vec::with_capacity(pages.len());
    let mut warnings = Vec::new();

    for page in pages {
        let image = printpdf::RawImage::decode_from_bytes(&page.png, &mut warnings)
            .map_err(|e| Error::Assembly(format!("page {}: undecodable capture: {}", page.position, e)))?;
        let image_id = doc.add_image(&image);

        // Placed at the origin; the DPI override maps image pixels straight
        // to page inches (1920px / 96dpi = the full 20in width).
        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                dpi: Some(RENDER_DPI),
                ..Default::default()
            },
        }];
        pdf_pages.push(PdfPage::new(page_width, page_height, ops));
    }

    doc.pages = pdf_pages;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tiny valid PNG standing in for a slide capture.
    fn fixture_png(shade: u8) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([shade, shade, shade]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn fixture_pages(n: usize) -> Vec<RenderedPage> {
        (0..n)
            .map(|position| RenderedPage {
                position,
                png: fixture_png((position * 40) as u8),
            })
            .collect()
    }

    #[test]
    fn test_page_count_matches_input() {
        for n in [1usize, 3, 7] {
            let doc = build_document("demo", &fixture_pages(n)).unwrap();
            assert_eq!(doc.pages.len(), n);
            for page in &doc.pages {
                assert!(!page.ops.is_empty());
            }
        }
    }

    #[test]
    fn test_zero_pages_rejected() {
        let err = build_document("demo", &[]).unwrap_err();
        assert!(matches!(err, Error::Assembly(_)));
    }

    #[test]
    fn test_undecodable_capture_is_assembly_error() {
        let pages = vec![RenderedPage { position: 0, png: b"not a png".to_vec() }];
        let err = build_document("demo", &pages).unwrap_err();
        match err {
            Error::Assembly(msg) => assert!(msg.contains("page 0")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_assemble_produces_pdf_bytes() {
        let bytes = assemble("demo", &fixture_pages(2)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_repeat_assembly_has_stable_geometry() {
        // Byte-identical output is not guaranteed, page structure is.
        let pages = fixture_pages(2);
        let a = build_document("demo", &pages).unwrap();
        let b = build_document("demo", &pages).unwrap();
        assert_eq!(a.pages.len(), b.pages.len());
    }
}
