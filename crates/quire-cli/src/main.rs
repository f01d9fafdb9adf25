//! CLI application for quire invoices and quotes.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{catalog, config, documents, draft, export};

/// quire - invoices and quotes from the terminal
#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit a document kept in a local draft file
    Draft(draft::DraftArgs),

    /// List and manage saved documents
    Documents(documents::DocumentsArgs),

    /// Manage saved clients
    Clients(catalog::ClientsArgs),

    /// Manage saved catalog items
    Items(catalog::ItemsArgs),

    /// Export a saved document to PDF
    Export(export::ExportArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Draft(args) => draft::run(args, config_path).await,
        Commands::Documents(args) => documents::run(args, config_path).await,
        Commands::Clients(args) => catalog::run_clients(args, config_path).await,
        Commands::Items(args) => catalog::run_items(args, config_path).await,
        Commands::Export(args) => export::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
