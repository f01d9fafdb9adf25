//! Error types for the quire-core library.

use serde::Serialize;
use thiserror::Error;

/// Main error type for the quire library.
#[derive(Error, Debug)]
pub enum QuireError {
    /// The document failed its submission checks.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A single field could not be parsed or was out of range.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// An editing operation was rejected.
    #[error("editor error: {0}")]
    Editor(#[from] EditorError),

    /// Persistence layer error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Export pipeline error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A field-level validation failure surfaced inline at the field.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `lineItems[2].description`).
    pub field: String,
    /// Human readable reason.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// All blocking issues found when a document is submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} issue(s): {}", .0.len(), summarize(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Whether the given field path has an error.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors raised while coercing raw input into a line-item or header field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The text is not a number.
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: String, value: String },

    /// The number is outside the accepted range.
    #[error("{field}: {value} must be {bound}")]
    OutOfRange {
        field: String,
        value: String,
        bound: String,
    },

    /// The text is not a calendar date (YYYY-MM-DD).
    #[error("{field}: '{value}' is not a date")]
    NotADate { field: String, value: String },

    /// Unknown field or status name.
    #[error("unknown {kind}: {value}")]
    Unknown { kind: String, value: String },
}

/// Errors from structural editing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Line-item index outside the current sequence.
    #[error("line item {index} does not exist ({len} present)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Attempt to remove the only line item.
    #[error("a document needs at least one line item")]
    LastLineItem,

    /// Catalog entry not found for autofill.
    #[error("catalog {kind} not found: {id}")]
    CatalogMiss { kind: &'static str, id: String },

    /// Status not allowed for the document kind.
    #[error("status {status} is not valid for {kind} documents")]
    StatusMismatch { status: String, kind: String },

    /// Only quotes can be converted to invoices.
    #[error("{0} is not a quote")]
    NotAQuote(String),
}

/// Errors from the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store call failed.
    #[error("{operation} failed: {reason}")]
    Backend { operation: String, reason: String },

    /// Requested record is absent (or owned by someone else).
    #[error("{collection} record not found: {id}")]
    NotFound { collection: String, id: String },

    /// The record has no id yet.
    #[error("record has not been saved yet")]
    Unsaved,

    /// Serialization of a stored record failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn backend(operation: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Backend {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(collection: impl Into<String>, id: impl ToString) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id: id.to_string(),
        }
    }
}

/// Errors from the rasterize-and-paginate export pipeline.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The off-screen surface never signalled that its layout settled.
    #[error("render surface dropped before layout settled")]
    RenderNotSettled,

    /// An export of the same document is still running.
    #[error("an export of {0} is already in progress")]
    AlreadyInFlight(String),

    /// The export was cancelled before the file was written.
    #[error("export cancelled")]
    Cancelled,

    /// The layout has no area to capture.
    #[error("layout is empty ({width}x{height})")]
    EmptyLayout { width: u32, height: u32 },

    /// Bitmap encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF assembly or parsing failed.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::Pdf(e.to_string())
    }
}

/// Result type for the quire library.
pub type Result<T> = std::result::Result<T, QuireError>;
