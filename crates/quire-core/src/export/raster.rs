//! Off-screen rasterization of a page layout.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb as Pixel, RgbImage};
use tracing::trace;

use super::glyphs::{self, COLUMNS, ROWS};
use crate::error::ExportError;
use crate::layout::metrics::advance;
use crate::layout::{Element, PageLayout, Rgb, TextRun};

/// Glyph pixels per em; a glyph cell is 6 x 10 of these.
const EM_UNITS: f32 = 10.0;

/// Pixel size of `layout` rendered at `scale`.
pub fn raster_size(layout: &PageLayout, scale: u32) -> (u32, u32) {
    let scale = scale.max(1) as f32;
    (
        (layout.width * scale).ceil() as u32,
        (layout.height * scale).ceil() as u32,
    )
}

/// Render `layout` at `scale` pixels per layout unit on a white background,
/// allocating and painting only the top `max_rows` pixel rows.
pub fn rasterize_rows(
    layout: &PageLayout,
    scale: u32,
    max_rows: u32,
) -> Result<RgbImage, ExportError> {
    let (width, full_height) = raster_size(layout, scale);
    if width == 0 || full_height == 0 {
        return Err(ExportError::EmptyLayout {
            width,
            height: full_height,
        });
    }
    let height = full_height.min(max_rows.max(1));
    let scale = scale.max(1) as f32;

    let mut img = RgbImage::from_pixel(width, height, pixel(Rgb::WHITE));

    for element in &layout.elements {
        match element {
            Element::Fill {
                x,
                y,
                width,
                height,
                color,
            } => fill_rect(&mut img, x * scale, y * scale, width * scale, height * scale, *color),
            Element::Rule {
                x,
                y,
                width,
                thickness,
                color,
            } => fill_rect(
                &mut img,
                x * scale,
                y * scale,
                width * scale,
                (thickness * scale).max(1.0),
                *color,
            ),
            Element::Text(run) => draw_text(&mut img, run, scale),
        }
    }

    trace!("Rasterized layout to {}x{} of {} px rows", width, height, full_height);
    Ok(img)
}

fn pixel(color: Rgb) -> Pixel<u8> {
    Pixel([color.0, color.1, color.2])
}

fn fill_rect(img: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((y + h).ceil().max(0.0) as u32).min(img.height());

    let p = pixel(color);
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px, py, p);
        }
    }
}

fn draw_text(img: &mut RgbImage, run: &TextRun, scale: f32) {
    if run.y * scale >= img.height() as f32 {
        return;
    }
    let dot = run.size / EM_UNITS * scale;
    let step = advance(run.size) * scale;
    let left = run.left() * scale;
    // one blank em row above the glyph
    let top = run.y * scale + dot;

    let passes: &[f32] = if run.bold { &[0.0, 0.5] } else { &[0.0] };

    for (i, c) in run.text.chars().enumerate() {
        let cell_x = left + i as f32 * step;
        for column in 0..COLUMNS {
            for row in 0..ROWS {
                if !glyphs::is_set(c, column, row) {
                    continue;
                }
                for offset in passes {
                    fill_rect(
                        img,
                        cell_x + (column as f32 + offset) * dot,
                        top + row as f32 * dot,
                        dot,
                        dot,
                        run.color,
                    );
                }
            }
        }
    }
}

/// Encode as baseline JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}
