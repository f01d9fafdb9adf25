//! Export command - render a saved document to a PDF file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use quire_core::{inspect_pdf, ExportError, ExportSink, Exporter};

use super::{load_config, open_service};

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Id of the saved document
    id: String,

    /// Output directory (defaults to export.output_dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Read the written file back and report what it contains
    #[arg(long)]
    verify: bool,
}

/// Writes exported files into a directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ExportSink for DirectorySink {
    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExportError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path.display().to_string())
    }
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let doc = open_service(&config).get(&args.id).await?;

    let sink = DirectorySink::new(
        args.output_dir
            .unwrap_or_else(|| config.export.output_dir.clone()),
    );
    let exporter = Exporter::offscreen(&config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling export");
            on_interrupt.cancel();
        }
    });

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Exporting {}...", doc.title()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = exporter.export(&doc, &sink, &cancel).await;
    pb.finish_and_clear();
    let outcome = result?;

    println!(
        "{} Exported {} to {} ({} bytes) in {:?}",
        style("✓").green(),
        doc.title(),
        outcome.location,
        outcome.size,
        start.elapsed()
    );
    if outcome.cropped {
        println!(
            "{} Content was taller than one page and has been cropped",
            style("!").yellow()
        );
    }

    if args.verify {
        let bytes = fs::read(&outcome.location).await?;
        let report = inspect_pdf(&bytes)?;
        println!("   Pages:     {}", report.page_count);
        println!("   Media box: {:?}", report.media_box);
        for image in &report.images {
            println!(
                "   Image:     {}x{} px ({})",
                image.width,
                image.height,
                image.filter.as_deref().unwrap_or("raw")
            );
        }
        if let Some(transform) = &report.image_transform {
            println!("   Placement: {:?}", transform);
        }
        for text in &report.texts {
            println!("   Text:      {}", text);
        }
    }

    Ok(())
}
