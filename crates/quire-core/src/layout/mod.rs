//! Fixed-width page layout.
//!
//! A [`PageLayout`] is a flat list of positioned elements in layout units
//! (points), origin at the top-left corner, y growing downwards. It is a
//! pure function of the document, so the same document always yields the
//! same layout.

pub mod metrics;
mod template;

pub use template::layout_document;

use crate::models::config::QuireConfig;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const INK: Rgb = Rgb(17, 24, 39);
    pub const MUTED: Rgb = Rgb(107, 114, 128);
    pub const RULE: Rgb = Rgb(209, 213, 219);
    pub const HEADER_FILL: Rgb = Rgb(243, 244, 246);
}

/// Horizontal anchoring of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Anchor x; left edge, centre, or right edge depending on `align`.
    pub x: f32,
    /// Top of the line box.
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub align: Align,
    pub color: Rgb,
    pub text: String,
}

impl TextRun {
    /// Left edge after applying alignment.
    pub fn left(&self) -> f32 {
        let width = metrics::text_width(&self.text, self.size);
        match self.align {
            Align::Left => self.x,
            Align::Center => self.x - width / 2.0,
            Align::Right => self.x - width,
        }
    }
}

/// A positioned drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),
    /// Horizontal line.
    Rule {
        x: f32,
        y: f32,
        width: f32,
        thickness: f32,
        color: Rgb,
    },
    /// Filled rectangle.
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
}

/// Line-item table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Description,
    Quantity,
    UnitPrice,
    TaxPercent,
    Total,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Description => "Description",
            ColumnKind::Quantity => "Qty",
            ColumnKind::UnitPrice => "Unit Price",
            ColumnKind::TaxPercent => "Tax %",
            ColumnKind::Total => "Total",
        }
    }
}

/// A resolved table column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub kind: ColumnKind,
    pub x: f32,
    pub width: f32,
    pub align: Align,
}

impl Column {
    /// Anchor x for text in this column.
    pub fn anchor(&self) -> f32 {
        match self.align {
            Align::Left => self.x,
            Align::Center => self.x + self.width / 2.0,
            Align::Right => self.x + self.width,
        }
    }
}

/// The laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    /// `Invoice #<n>` or `Quote #<n>`.
    pub title: String,
    pub columns: Vec<Column>,
    pub elements: Vec<Element>,
}

impl PageLayout {
    pub fn has_column(&self, kind: ColumnKind) -> bool {
        self.columns.iter().any(|c| c.kind == kind)
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Whether some text run reads exactly `text`.
    pub fn contains_text(&self, text: &str) -> bool {
        self.text_runs().any(|run| run.text == text)
    }
}

/// Inputs to the layout besides the document itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Template width (page width minus both margins).
    pub width: f32,
    /// Inner padding on every side.
    pub padding: f32,
    /// Minimum height; content shorter than this is padded.
    pub min_height: f32,
    pub currency_symbol: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 515.0,
            padding: 40.0,
            min_height: 0.0,
            currency_symbol: "$".to_string(),
        }
    }
}

impl LayoutOptions {
    pub fn from_config(config: &QuireConfig) -> Self {
        Self {
            width: config.export.content_width(),
            min_height: config.export.min_height,
            currency_symbol: config.display.currency_symbol.clone(),
            ..Default::default()
        }
    }
}
