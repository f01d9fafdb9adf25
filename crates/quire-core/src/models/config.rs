//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::QuireError;

/// Main configuration for quire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    /// Page and raster settings for PDF export.
    pub export: ExportConfig,

    /// Defaults for new documents.
    pub editor: EditorConfig,

    /// Where records live and who owns them.
    pub store: StoreConfig,

    /// Display settings.
    pub display: DisplayConfig,
}

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Page width in points (A4 = 595).
    pub page_width: f32,

    /// Page height in points (A4 = 842).
    pub page_height: f32,

    /// Margin on every side in points.
    pub margin: f32,

    /// Raster pixels per layout unit.
    pub scale: u32,

    /// JPEG quality for the embedded bitmap (1 - 100).
    pub jpeg_quality: u8,

    /// Draw the title as selectable text above the bitmap.
    pub overlay_title: bool,

    /// Minimum layout height in points (0 = fit content).
    pub min_height: f32,

    /// Directory exported files are written to.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 40.0,
            scale: 2,
            jpeg_quality: 90,
            overlay_title: true,
            min_height: 0.0,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportConfig {
    /// Usable content width (page width minus both margins).
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Usable content height (page height minus both margins).
    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }
}

/// Editor defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Days between issue date and due date on new documents.
    pub payment_terms_days: u32,

    /// Prefix for generated invoice numbers.
    pub invoice_prefix: String,

    /// Prefix for generated quote numbers.
    pub quote_prefix: String,

    /// Digits in the generated number suffix.
    pub number_length: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            payment_terms_days: 30,
            invoice_prefix: "INV".to_string(),
            quote_prefix: "QUO".to_string(),
            number_length: 6,
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one JSON file per collection.
    pub data_dir: PathBuf,

    /// Owner id every record is scoped by.
    pub user_id: String,

    /// Optional display name for the owner.
    pub display_name: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("quire-data"),
            user_id: "local".to_string(),
            display_name: None,
        }
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency symbol placed before amounts.
    ///
    /// ASCII only: the export glyph table has no non-ASCII characters.
    pub currency_symbol: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

impl QuireConfig {
    /// Check values the export cannot honour.
    pub fn validate(&self) -> Result<(), QuireError> {
        let symbol = &self.display.currency_symbol;
        if !symbol.is_ascii() || symbol.chars().any(|c| c.is_ascii_control()) {
            return Err(QuireError::Config(format!(
                "currency_symbol '{}' must be printable ASCII",
                symbol
            )));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        config.validate().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        self.validate().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
