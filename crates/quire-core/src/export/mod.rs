//! PDF export: rasterize the laid-out page and embed it in a one-page file.

mod glyphs;
pub mod inspect;
pub mod pdf;
mod pipeline;
pub mod raster;

pub use inspect::{inspect_pdf, ImageInfo, PdfReport};
pub use pdf::Placement;
pub use pipeline::{
    export_file_name, ExportOutcome, ExportSink, Exporter, MemorySink, OffscreenSurface,
    RenderSurface, RenderedPdf,
};
