//! Single-page PDF assembly with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::ExportError;
use crate::models::config::ExportConfig;

/// Resource name of the page bitmap.
pub const IMAGE_NAME: &str = "Im1";

/// Resource name of the title font.
pub const FONT_NAME: &str = "F1";

/// Size of the overlaid title.
pub const TITLE_FONT_SIZE: f32 = 24.0;

/// Where the bitmap lands on the page, in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixel rows of the source bitmap that fit on the page.
    pub rows: u32,
    /// Whether content below the page was cut off.
    pub cropped: bool,
}

/// Scale a bitmap to the content width and clamp it to the remaining height.
pub fn fit_to_page(pixel_width: u32, pixel_height: u32, page: &ExportConfig) -> Placement {
    let width = page.content_width();
    let max_height = page.content_height();
    let units_per_pixel = width / pixel_width.max(1) as f32;

    let full_height = pixel_height as f32 * units_per_pixel;
    let (rows, height, cropped) = if full_height > max_height {
        let rows = (max_height / units_per_pixel).floor().max(1.0) as u32;
        (rows, rows as f32 * units_per_pixel, true)
    } else {
        (pixel_height, full_height, false)
    };

    Placement {
        x: page.margin,
        y: page.page_height - page.margin - height,
        width,
        height,
        rows,
        cropped,
    }
}

/// Everything needed to write the page.
pub struct PageImage<'a> {
    pub jpeg: &'a [u8],
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub placement: Placement,
}

fn title_origin(title: &str, page: &ExportConfig) -> (f32, f32) {
    // Helvetica-Bold averages a little over half an em per glyph.
    let estimated = title.chars().count() as f32 * TITLE_FONT_SIZE * 0.6;
    let x = ((page.page_width - estimated) / 2.0).max(page.margin);
    let y = page.page_height - page.margin + (page.margin - TITLE_FONT_SIZE) / 2.0;
    (x, y)
}

/// Build a one-page PDF with the bitmap and an optional selectable title.
pub fn build_pdf(
    image: &PageImage<'_>,
    page: &ExportConfig,
    title: Option<&str>,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.pixel_width as i64,
            "Height" => image.pixel_height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
            "Filter" => "DCTDecode",
        },
        image.jpeg.to_vec(),
    );
    let image_id = doc.add_object(image_stream);

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let p = image.placement;
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                p.width.into(),
                0i64.into(),
                0i64.into(),
                p.height.into(),
                p.x.into(),
                p.y.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ];

    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        let (x, y) = title_origin(title, page);
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("rg", vec![0i64.into(), 0i64.into(), 0i64.into()]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_NAME.as_bytes().to_vec()), TITLE_FONT_SIZE.into()],
            ),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(title)]),
            Operation::new("ET", vec![]),
        ]);
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0i64.into(),
            0i64.into(),
            page.page_width.into(),
            page.page_height.into(),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { IMAGE_NAME => image_id },
            "Font" => dictionary! { FONT_NAME => font_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Producer" => Object::string_literal(concat!("quire ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
