//! Subcommands and the setup they share.

pub mod catalog;
pub mod config;
pub mod documents;
pub mod draft;
pub mod export;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use quire_core::models::config::QuireConfig;
use quire_core::{DocumentService, JsonStore};

/// `<config_dir>/quire/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quire")
        .join("config.json")
}

/// The file named by `-c`, else the default file when present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<QuireConfig> {
    if let Some(path) = config_path {
        return Ok(QuireConfig::from_file(Path::new(path))?);
    }
    let path = default_config_path();
    if path.exists() {
        Ok(QuireConfig::from_file(&path)?)
    } else {
        Ok(QuireConfig::default())
    }
}

/// Service over the JSON store in the configured data directory.
pub fn open_service(config: &QuireConfig) -> DocumentService {
    let dir = &config.store.data_dir;
    debug!("Using data directory {}", dir.display());
    DocumentService::new(
        config.store.user_id.clone(),
        Arc::new(JsonStore::new(dir)),
        Arc::new(JsonStore::new(dir)),
        Arc::new(JsonStore::new(dir)),
    )
}
