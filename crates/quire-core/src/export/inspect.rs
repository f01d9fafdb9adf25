//! Read an exported file back and report what it contains.

use lopdf::content::Content;
use lopdf::{Document, Object};
use tracing::debug;

use crate::error::ExportError;

/// An image XObject found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Stream filter, e.g. `DCTDecode`.
    pub filter: Option<String>,
}

/// Summary of an exported PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfReport {
    pub page_count: usize,
    /// MediaBox of the first page.
    pub media_box: Vec<f32>,
    pub images: Vec<ImageInfo>,
    /// Operands of the first `cm` on the first page: `[w 0 0 h x y]`.
    pub image_transform: Option<Vec<f32>>,
    /// Text shown with `Tj` on the first page.
    pub texts: Vec<String>,
}

impl PdfReport {
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.contains(needle))
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn image_info(obj: &Object) -> Option<ImageInfo> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    let subtype = dict.get(b"Subtype").ok()?.as_name().ok()?;
    if subtype != b"Image".as_slice() {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    let filter = match dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        Ok(Object::Array(arr)) => arr
            .first()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned()),
        _ => None,
    };

    Some(ImageInfo {
        width,
        height,
        filter,
    })
}

/// Parse `bytes` and summarize the first page.
pub fn inspect_pdf(bytes: &[u8]) -> Result<PdfReport, ExportError> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    let page_count = pages.len();

    let Some((_, &page_id)) = pages.iter().next() else {
        return Err(ExportError::Pdf("document has no pages".to_string()));
    };

    let page = doc.get_object(page_id)?.as_dict()?;
    let media_box = page
        .get(b"MediaBox")
        .and_then(Object::as_array)
        .map(|arr| arr.iter().filter_map(number).collect())
        .unwrap_or_default();

    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let mut image_transform = None;
    let mut texts = Vec::new();
    for op in &content.operations {
        match op.operator.as_str() {
            "cm" if image_transform.is_none() => {
                image_transform = Some(op.operands.iter().filter_map(number).collect());
            }
            "Tj" => {
                if let Some(Object::String(raw, _)) = op.operands.first() {
                    texts.push(String::from_utf8_lossy(raw).into_owned());
                }
            }
            _ => {}
        }
    }

    let images: Vec<ImageInfo> = doc.objects.values().filter_map(image_info).collect();

    debug!(
        "Inspected PDF: {} pages, {} images, {} text runs",
        page_count,
        images.len(),
        texts.len()
    );

    Ok(PdfReport {
        page_count,
        media_box,
        images,
        image_transform,
        texts,
    })
}
