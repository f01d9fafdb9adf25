//! Documents command - list, inspect, and manage saved documents.

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use console::style;

use quire_core::layout::metrics::{advance, truncate_to_width};
use quire_core::money::{format_currency_with, format_number, round_cents};
use quire_core::query::{apply, client_names};
use quire_core::{Document, DocumentKind, ListQuery, SortDirection, SortField, Status};

use super::{load_config, open_service};

/// Arguments for the documents command.
#[derive(Args)]
pub struct DocumentsArgs {
    #[command(subcommand)]
    command: DocumentsCommand,
}

#[derive(Subcommand)]
enum DocumentsCommand {
    /// List invoices (or quotes) with filters
    List(ListArgs),

    /// Show one document
    Show { id: String },

    /// Delete a document
    Delete { id: String },

    /// Invoice counts and amounts by status
    Stats,

    /// Change the status of a document (draft, pending, paid, overdue)
    SetStatus {
        id: String,
        #[arg(value_parser = Status::parse)]
        status: Status,
    },

    /// Convert a quote into a draft invoice
    Convert { id: String },

    /// Distinct client names across saved documents
    Clients,
}

/// Output format.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    Table,
    /// CSV output
    Csv,
    /// JSON output
    Json,
}

#[derive(Args)]
struct ListArgs {
    /// List quotes instead of invoices
    #[arg(long)]
    quotes: bool,

    /// Only this status
    #[arg(long, value_parser = Status::parse)]
    status: Option<Status>,

    /// Only this client (exact name)
    #[arg(long)]
    client: Option<String>,

    /// Issued on or after (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Issued on or before (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Text in number, client name, or email
    #[arg(short, long)]
    search: Option<String>,

    /// Sort by date, client, or amount
    #[arg(long, default_value = "date")]
    sort: SortField,

    /// Ascending order (default is descending)
    #[arg(long)]
    asc: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,
}

pub async fn run(args: DocumentsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let service = open_service(&config);
    let symbol = config.display.currency_symbol.as_str();

    match args.command {
        DocumentsCommand::List(list_args) => {
            let docs = service.list().await?;
            let query = ListQuery {
                kind: Some(if list_args.quotes {
                    DocumentKind::Quote
                } else {
                    DocumentKind::Invoice
                }),
                status: list_args.status,
                client_name: list_args.client,
                date_from: list_args.from,
                date_to: list_args.to,
                search: list_args.search,
                sort_field: list_args.sort,
                sort_direction: if list_args.asc {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                },
            };
            let rows = apply(&docs, &query);
            match list_args.format {
                OutputFormat::Table => print_table(&rows, symbol),
                OutputFormat::Csv => print!("{}", format_csv(&rows)?),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            }
            Ok(())
        }
        DocumentsCommand::Show { id } => {
            let doc = service.get(&id).await?;
            print_document(&doc, symbol);
            Ok(())
        }
        DocumentsCommand::Delete { id } => {
            service.delete(&id).await?;
            println!("{} Deleted {}", style("✓").green(), id);
            Ok(())
        }
        DocumentsCommand::Stats => {
            let stats = service.stats().await?;
            println!("{}", style("Invoices").bold());
            println!(
                "  Total    {:>4}  {}",
                stats.total_count,
                format_currency_with(stats.total_amount, symbol)
            );
            println!(
                "  Paid     {:>4}  {}",
                stats.paid_count,
                format_currency_with(stats.paid_amount, symbol)
            );
            println!(
                "  Pending  {:>4}  {}",
                stats.pending_count,
                format_currency_with(stats.pending_amount, symbol)
            );
            println!(
                "  Overdue  {:>4}  {}",
                stats.overdue_count,
                format_currency_with(stats.overdue_amount, symbol)
            );
            println!("  Draft    {:>4}", stats.draft_count);
            Ok(())
        }
        DocumentsCommand::SetStatus { id, status } => {
            let doc = service.set_status(&id, status).await?;
            println!("{} {} is now {}", style("✓").green(), doc.title(), doc.status);
            Ok(())
        }
        DocumentsCommand::Convert { id } => {
            let doc = service.convert_quote(&id).await?;
            println!(
                "{} {} is now a draft invoice",
                style("✓").green(),
                doc.number
            );
            Ok(())
        }
        DocumentsCommand::Clients => {
            let docs = service.list().await?;
            for name in client_names(&docs) {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn print_table(rows: &[&Document], symbol: &str) {
    if rows.is_empty() {
        println!("{} No documents found", style("ℹ").blue());
        return;
    }

    let client_width = advance(10.0) * 24.0;
    println!(
        "{:<14} {:<10} {:<24} {:>12}  {:<8}  {}",
        style("NUMBER").bold(),
        style("DATE").bold(),
        style("CLIENT").bold(),
        style("AMOUNT").bold(),
        style("STATUS").bold(),
        style("ID").dim()
    );
    for doc in rows {
        println!(
            "{:<14} {:<10} {:<24} {:>12}  {:<8}  {}",
            doc.number,
            doc.issue_date,
            truncate_to_width(&doc.recipient.name, client_width, 10.0),
            format_currency_with(doc.grand_total(), symbol),
            doc.status,
            style(doc.id.as_deref().unwrap_or("-")).dim()
        );
    }
}

fn format_csv(rows: &[&Document]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "id",
        "kind",
        "number",
        "issue_date",
        "due_date",
        "client",
        "email",
        "status",
        "total",
    ])?;

    for doc in rows {
        wtr.write_record([
            doc.id.as_deref().unwrap_or(""),
            &doc.kind.to_string(),
            &doc.number,
            &doc.issue_date.to_string(),
            &doc.due_date.to_string(),
            &doc.recipient.name,
            &doc.recipient.email,
            doc.status.as_str(),
            &format!("{:.2}", round_cents(doc.grand_total())),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Print a document with its line items and totals.
pub fn print_document(doc: &Document, symbol: &str) {
    let totals = doc.totals();

    println!("{}  {}", style(doc.title()).bold(), style(doc.status).cyan());
    if let Some(id) = &doc.id {
        println!("{}", style(id).dim());
    }
    println!();
    println!("From:     {}", doc.sender.name);
    println!("Bill to:  {} <{}>", doc.recipient.name, doc.recipient.email);
    if !doc.recipient.address.is_empty() {
        println!("          {}", doc.recipient.address);
    }
    println!("Issued:   {}", doc.issue_date);
    println!("Due:      {}", doc.due_date);
    println!();

    for (index, item) in doc.line_items.iter().enumerate() {
        println!(
            "  {:>2}. {:<32} {:>6} x {:>10}  tax {:>5}%  {:>12}",
            index,
            item.description,
            format_number(item.quantity),
            format_currency_with(item.unit_price, symbol),
            format_number(item.tax_percent),
            format_currency_with(item.total(), symbol)
        );
    }

    println!();
    println!("  Subtotal  {:>12}", format_currency_with(totals.subtotal, symbol));
    println!("  Tax       {:>12}", format_currency_with(totals.tax_total, symbol));
    println!(
        "  {}     {:>12}",
        style("Total").bold(),
        style(format_currency_with(totals.grand_total, symbol)).bold()
    );

    if let Some(notes) = doc.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        println!();
        println!("Notes: {}", notes);
    }
}
