//! Draft command - edit a document kept in a local JSON file.
//!
//! Each invocation loads the draft, applies one edit through the core
//! editor, and writes it back. `save` submits it to the store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use quire_core::editor::{CatalogLookup, HeaderField, LineItemField};
use quire_core::models::config::QuireConfig;
use quire_core::money::{format_currency_with, format_number};
use quire_core::{Document, DocumentEditor};

use super::documents::print_document;
use super::{load_config, open_service};

/// Arguments for the draft command.
#[derive(Args)]
pub struct DraftArgs {
    #[command(subcommand)]
    command: DraftCommand,
}

#[derive(Subcommand)]
enum DraftCommand {
    /// Start a new invoice (or quote) draft
    New {
        /// Start a quote instead of an invoice
        #[arg(long)]
        quote: bool,

        /// Draft file to create
        #[arg(short, long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the draft with computed totals
    Show { file: PathBuf },

    /// Append a line item
    AddLine {
        file: PathBuf,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        quantity: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        tax: Option<String>,
    },

    /// Set one field of a line item (index starts at 0)
    SetLine {
        file: PathBuf,
        index: usize,
        /// description, quantity, price, or tax
        field: LineItemField,
        value: String,
    },

    /// Remove a line item
    RemoveLine { file: PathBuf, index: usize },

    /// Move a line item; without a target nothing changes
    MoveLine {
        file: PathBuf,
        from: usize,
        to: Option<usize>,
    },

    /// Fill a line item from a saved catalog item
    UseItem {
        file: PathBuf,
        index: usize,
        item_id: String,
    },

    /// Fill the recipient from a saved client
    UseClient { file: PathBuf, client_id: String },

    /// Set a header, party, notes, or status field
    Set {
        file: PathBuf,
        /// e.g. number, issueDate, sender.name, recipient.email, notes, status
        field: HeaderField,
        value: String,
    },

    /// List catalog items matching a line's description
    Suggest { file: PathBuf, index: usize },

    /// Validate and save the draft to the store
    Save { file: PathBuf },
}

pub async fn run(args: DraftArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        DraftCommand::New {
            quote,
            output,
            force,
        } => new_draft(&config, quote, &output, force),
        DraftCommand::Show { file } => {
            let editor = load_draft(&file)?;
            print_document(editor.document(), &config.display.currency_symbol);
            print_issues(&editor);
            Ok(())
        }
        DraftCommand::AddLine {
            file,
            description,
            quantity,
            price,
            tax,
        } => {
            let mut editor = load_draft(&file)?;
            let index = editor.add_line_item();
            let fields = [
                (LineItemField::Description, description),
                (LineItemField::Quantity, quantity),
                (LineItemField::UnitPrice, price),
                (LineItemField::TaxPercent, tax),
            ];
            for (field, value) in fields {
                if let Some(value) = value {
                    editor.update_field(index, field, &value)?;
                }
            }
            store_draft(&file, &editor)?;
            println!("{} Added line {}", style("✓").green(), index);
            print_totals(&editor, &config);
            Ok(())
        }
        DraftCommand::SetLine {
            file,
            index,
            field,
            value,
        } => {
            let mut editor = load_draft(&file)?;
            editor.update_field(index, field, &value)?;
            store_draft(&file, &editor)?;
            println!("{} Set line {} {}", style("✓").green(), index, field);
            print_totals(&editor, &config);
            Ok(())
        }
        DraftCommand::RemoveLine { file, index } => {
            let mut editor = load_draft(&file)?;
            let removed = editor.remove_line_item(index)?;
            store_draft(&file, &editor)?;
            println!(
                "{} Removed line {} ({})",
                style("✓").green(),
                index,
                removed.description
            );
            print_totals(&editor, &config);
            Ok(())
        }
        DraftCommand::MoveLine { file, from, to } => {
            let mut editor = load_draft(&file)?;
            if editor.reorder(from, to)? {
                store_draft(&file, &editor)?;
                println!("{} Moved line {} to {}", style("✓").green(), from, to.unwrap_or(from));
            } else {
                println!("{} Order unchanged", style("ℹ").blue());
            }
            Ok(())
        }
        DraftCommand::UseItem {
            file,
            index,
            item_id,
        } => {
            let mut editor = load_draft(&file)?;
            let catalog = open_service(&config).catalog().await?;
            editor.autofill_from_catalog(index, &item_id, &catalog)?;
            store_draft(&file, &editor)?;
            println!(
                "{} Line {} is now {}",
                style("✓").green(),
                index,
                editor.line_items()[index].description
            );
            print_totals(&editor, &config);
            Ok(())
        }
        DraftCommand::UseClient { file, client_id } => {
            let mut editor = load_draft(&file)?;
            let catalog = open_service(&config).catalog().await?;
            editor.autofill_recipient_from_client(&client_id, &catalog)?;
            store_draft(&file, &editor)?;
            println!(
                "{} Billing {}",
                style("✓").green(),
                editor.document().recipient.name
            );
            Ok(())
        }
        DraftCommand::Set { file, field, value } => {
            let mut editor = load_draft(&file)?;
            editor.set_header(field, &value)?;
            store_draft(&file, &editor)?;
            println!("{} Set {}", style("✓").green(), field);
            Ok(())
        }
        DraftCommand::Suggest { file, index } => {
            let editor = load_draft(&file)?;
            let catalog = open_service(&config).catalog().await?;
            suggest(&editor, index, &catalog, &config)
        }
        DraftCommand::Save { file } => save_draft(&config, &file).await,
    }
}

fn new_draft(config: &QuireConfig, quote: bool, output: &Path, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "Draft already exists at {}. Use --force to overwrite.",
            output.display()
        );
    }

    let today = Local::now().date_naive();
    let owner = config.store.user_id.clone();
    let mut editor = if quote {
        DocumentEditor::new_quote(owner, &config.editor, today)
    } else {
        DocumentEditor::new_invoice(owner, &config.editor, today)
    };
    if let Some(name) = &config.store.display_name {
        editor.set_header(HeaderField::SenderName, name)?;
    }

    store_draft(output, &editor)?;
    println!(
        "{} Created {} draft {} at {}",
        style("✓").green(),
        editor.document().kind,
        editor.document().number,
        output.display()
    );
    Ok(())
}

fn load_draft(path: &Path) -> anyhow::Result<DocumentEditor> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read draft {}: {}", path.display(), e))?;
    let document: Document = serde_json::from_str(&content)?;
    Ok(DocumentEditor::open(document))
}

fn store_draft(path: &Path, editor: &DocumentEditor) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(editor.document())?)?;
    debug!("Wrote draft to {}", path.display());
    Ok(())
}

fn print_totals(editor: &DocumentEditor, config: &QuireConfig) {
    let totals = editor.totals();
    println!(
        "   Subtotal {}  Tax {}  Total {}",
        format_currency_with(totals.subtotal, &config.display.currency_symbol),
        format_currency_with(totals.tax_total, &config.display.currency_symbol),
        style(format_currency_with(totals.grand_total, &config.display.currency_symbol)).bold()
    );
}

fn print_issues(editor: &DocumentEditor) {
    let validation = editor.validate();
    if validation.errors.is_empty() && validation.warnings.is_empty() {
        return;
    }
    println!();
    for error in &validation.errors {
        println!("  {} {}", style("✗").red(), error);
    }
    for warning in &validation.warnings {
        println!("  {} {}", style("!").yellow(), warning);
    }
}

fn suggest(
    editor: &DocumentEditor,
    index: usize,
    catalog: &dyn CatalogLookup,
    config: &QuireConfig,
) -> anyhow::Result<()> {
    let matches = editor.suggestions(index, catalog)?;
    if matches.is_empty() {
        println!("{} No matching items", style("ℹ").blue());
        return Ok(());
    }
    for item in matches {
        println!(
            "{}  {}  {}  tax {}%",
            item.id.as_deref().unwrap_or("-"),
            item.description,
            format_currency_with(item.unit_price, &config.display.currency_symbol),
            format_number(item.tax_percent)
        );
    }
    Ok(())
}

async fn save_draft(config: &QuireConfig, file: &Path) -> anyhow::Result<()> {
    let editor = load_draft(file)?;
    let service = open_service(config);
    let saved = service.save(editor.into_document()).await?;

    // Keep the id so later saves update instead of creating a copy.
    store_draft(file, &DocumentEditor::open(saved.document.clone()))?;

    for warning in &saved.warnings {
        println!("  {} {}", style("!").yellow(), warning);
    }
    println!(
        "{} Saved {} {} as {}",
        style("✓").green(),
        saved.document.kind,
        saved.document.number,
        saved.document.id.as_deref().unwrap_or("-")
    );
    Ok(())
}
