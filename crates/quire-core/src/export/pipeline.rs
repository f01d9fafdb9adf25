//! The rasterize-and-paginate export pipeline.
//!
//! Stages run strictly in order: render off-screen, wait for the layout to
//! settle, rasterize, fit to the page, encode, assemble, write. At most one
//! export per document runs at a time and every stage checks the
//! cancellation token.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::pdf::{self, PageImage, Placement};
use super::raster;
use crate::error::ExportError;
use crate::layout::{layout_document, LayoutOptions, PageLayout};
use crate::models::config::{ExportConfig, QuireConfig};
use crate::models::document::Document;

/// A surface the document is laid out on before capture.
pub trait RenderSurface: Send + Sync {
    /// Start laying out `doc`. The receiver resolves once the layout has
    /// settled; a dropped sender means it never will.
    fn begin_render(&self, doc: &Document, opts: &LayoutOptions) -> oneshot::Receiver<PageLayout>;
}

/// Lays the document out synchronously and signals straight away.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffscreenSurface;

impl RenderSurface for OffscreenSurface {
    fn begin_render(&self, doc: &Document, opts: &LayoutOptions) -> oneshot::Receiver<PageLayout> {
        let (tx, rx) = oneshot::channel();
        // The receiver is still held here, so this cannot fail.
        let _ = tx.send(layout_document(doc, opts));
        rx
    }
}

/// Destination for finished files.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Store `bytes` under `file_name`; returns where it ended up.
    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExportError>;
}

/// Keeps written files in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files written so far, in order.
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExportError> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(file_name.to_string())
    }
}

/// `invoice-<number>.pdf`, or `invoice-export.pdf` without a number.
pub fn export_file_name(doc: &Document) -> String {
    let number: String = doc
        .number
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    if number.is_empty() {
        "invoice-export.pdf".to_string()
    } else {
        format!("invoice-{}.pdf", number)
    }
}

/// A finished, not yet written, export.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub placement: Placement,
}

/// Outcome of a completed export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub file_name: String,
    pub location: String,
    pub size: usize,
    pub cropped: bool,
}

/// Releases the in-flight slot on drop, including on error or cancellation.
struct InFlightGuard {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightGuard {
    fn acquire(keys: &Arc<Mutex<HashSet<String>>>, key: String) -> Result<Self, ExportError> {
        let mut set = keys.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(key.clone()) {
            return Err(ExportError::AlreadyInFlight(key));
        }
        Ok(Self {
            keys: Arc::clone(keys),
            key,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}

fn document_key(doc: &Document) -> String {
    match &doc.id {
        Some(id) => id.clone(),
        None => format!("number:{}", doc.number),
    }
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), ExportError> {
    if cancel.is_cancelled() {
        return Err(ExportError::Cancelled);
    }
    Ok(())
}

/// Runs exports against a render surface.
pub struct Exporter<S: RenderSurface = OffscreenSurface> {
    surface: S,
    page: ExportConfig,
    layout: LayoutOptions,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl Exporter<OffscreenSurface> {
    pub fn offscreen(config: &QuireConfig) -> Self {
        Self::new(OffscreenSurface, config)
    }
}

impl<S: RenderSurface> Exporter<S> {
    pub fn new(surface: S, config: &QuireConfig) -> Self {
        Self {
            surface,
            page: config.export.clone(),
            layout: LayoutOptions::from_config(config),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Whether an export of `doc` is running (the trigger should be disabled).
    pub fn is_in_flight(&self, doc: &Document) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&document_key(doc))
    }

    /// Produce the PDF bytes for `doc`.
    pub async fn render(
        &self,
        doc: &Document,
        cancel: &CancellationToken,
    ) -> Result<RenderedPdf, ExportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, document_key(doc))?;
        self.render_unguarded(doc, cancel).await
    }

    async fn render_unguarded(
        &self,
        doc: &Document,
        cancel: &CancellationToken,
    ) -> Result<RenderedPdf, ExportError> {
        ensure_live(cancel)?;
        debug!("Rendering {} off-screen", doc.title());

        let settled = self.surface.begin_render(doc, &self.layout);
        let layout = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExportError::Cancelled),
            layout = settled => layout.map_err(|_| ExportError::RenderNotSettled)?,
        };

        ensure_live(cancel)?;
        let (pixel_width, pixel_height) = raster::raster_size(&layout, self.page.scale);
        let placement = pdf::fit_to_page(pixel_width, pixel_height, &self.page);
        if placement.cropped {
            warn!(
                "{} is taller than one page; cropping to {} of {} px rows",
                doc.title(),
                placement.rows,
                pixel_height
            );
        }
        let bitmap = raster::rasterize_rows(&layout, self.page.scale, placement.rows)?;

        ensure_live(cancel)?;
        let jpeg = raster::encode_jpeg(&bitmap, self.page.jpeg_quality)?;
        let title = self.page.overlay_title.then(|| layout.title.clone());
        let bytes = pdf::build_pdf(
            &PageImage {
                jpeg: &jpeg,
                pixel_width: bitmap.width(),
                pixel_height: bitmap.height(),
                placement,
            },
            &self.page,
            title.as_deref(),
        )?;

        debug!("Assembled {} byte PDF", bytes.len());
        Ok(RenderedPdf {
            file_name: export_file_name(doc),
            bytes,
            pixel_width: bitmap.width(),
            pixel_height: bitmap.height(),
            placement,
        })
    }

    /// Render `doc` and hand the file to `sink`.
    ///
    /// Cancellation before the write leaves the sink untouched.
    pub async fn export(
        &self,
        doc: &Document,
        sink: &dyn ExportSink,
        cancel: &CancellationToken,
    ) -> Result<ExportOutcome, ExportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, document_key(doc))?;
        let rendered = self.render_unguarded(doc, cancel).await?;

        ensure_live(cancel)?;
        let location = sink.write(&rendered.file_name, &rendered.bytes).await?;
        info!("Exported {} to {}", doc.title(), location);

        Ok(ExportOutcome {
            file_name: rendered.file_name,
            location,
            size: rendered.bytes.len(),
            cropped: rendered.placement.cropped,
        })
    }
}
