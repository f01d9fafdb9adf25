//! Core library for quire invoice and quote documents.
//!
//! This crate provides:
//! - Document, client, and item models with decimal money
//! - The line-item editor (field coercion, reorder, catalog autofill, validation)
//! - A deterministic page layout and the rasterize-to-PDF export pipeline
//! - List filtering, sorting, and dashboard statistics
//! - Owner-scoped repositories (in-memory and JSON file backed)

pub mod editor;
pub mod error;
pub mod export;
pub mod layout;
pub mod models;
pub mod money;
pub mod numbering;
pub mod query;
pub mod service;
pub mod store;

pub use editor::{Catalog, CatalogLookup, DocumentEditor, HeaderField, LineItemField};
pub use error::{
    EditorError, ExportError, FieldError, QuireError, Result, StoreError, ValidationError,
    ValidationErrors,
};
pub use export::{
    export_file_name, inspect_pdf, ExportOutcome, ExportSink, Exporter, MemorySink,
    OffscreenSurface, PdfReport, RenderSurface, RenderedPdf,
};
pub use layout::{layout_document, LayoutOptions, PageLayout};
pub use models::catalog::{Client, Item};
pub use models::config::QuireConfig;
pub use models::document::{Document, DocumentKind, LineItem, Recipient, Sender, Status};
pub use money::{compute_totals, format_currency, Totals};
pub use query::{DashboardStats, ListQuery, SortDirection, SortField};
pub use service::{DocumentService, Saved};
#[cfg(feature = "native")]
pub use store::JsonStore;
pub use store::{MemoryStore, Record, Repository};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
