//! Clients and items commands - manage the autofill catalog.

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use quire_core::money::{format_currency_with, format_number, parse_amount};
use quire_core::{Client, Item};

use super::{load_config, open_service};

/// Arguments for the clients command.
#[derive(Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    command: ClientsCommand,
}

#[derive(Subcommand)]
enum ClientsCommand {
    /// Save a client
    Add(AddClientArgs),

    /// List saved clients
    List,

    /// Remove a client
    Remove { id: String },
}

#[derive(Args)]
struct AddClientArgs {
    name: String,
    email: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    address: String,

    #[arg(long, default_value = "")]
    city: String,

    #[arg(long, default_value = "")]
    state: String,

    #[arg(long, default_value = "")]
    zip_code: String,

    #[arg(long, default_value = "")]
    country: String,
}

/// Arguments for the items command.
#[derive(Args)]
pub struct ItemsArgs {
    #[command(subcommand)]
    command: ItemsCommand,
}

#[derive(Subcommand)]
enum ItemsCommand {
    /// Save a catalog item
    Add {
        description: String,

        /// Unit price
        price: String,

        /// Tax percent
        #[arg(long, default_value = "0")]
        tax: String,
    },

    /// List saved items
    List,

    /// Remove an item
    Remove { id: String },
}

pub async fn run_clients(args: ClientsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let service = open_service(&config);

    match args.command {
        ClientsCommand::Add(add) => {
            let mut client = Client::new(service.owner().to_string(), add.name, add.email);
            client.phone = add.phone;
            client.address = add.address;
            client.city = add.city;
            client.state = add.state;
            client.zip_code = add.zip_code;
            client.country = add.country;

            let saved = service.add_client(client).await?;
            println!(
                "{} Saved client {} as {}",
                style("✓").green(),
                saved.name,
                saved.id.as_deref().unwrap_or("-")
            );
        }
        ClientsCommand::List => {
            let catalog = service.catalog().await?;
            if catalog.clients.is_empty() {
                println!("{} No clients saved", style("ℹ").blue());
            }
            for client in &catalog.clients {
                println!(
                    "{}  {} <{}>",
                    style(client.id.as_deref().unwrap_or("-")).dim(),
                    client.name,
                    client.email
                );
            }
        }
        ClientsCommand::Remove { id } => {
            service.remove_client(&id).await?;
            println!("{} Removed client {}", style("✓").green(), id);
        }
    }

    Ok(())
}

fn parse_decimal(label: &str, raw: &str) -> anyhow::Result<Decimal> {
    parse_amount(raw).ok_or_else(|| anyhow::anyhow!("{}: '{}' is not a number", label, raw))
}

pub async fn run_items(args: ItemsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let service = open_service(&config);
    let symbol = config.display.currency_symbol.as_str();

    match args.command {
        ItemsCommand::Add {
            description,
            price,
            tax,
        } => {
            let item = Item::new(
                service.owner().to_string(),
                description,
                parse_decimal("price", &price)?,
                parse_decimal("tax", &tax)?,
            );
            let saved = service.add_item(item).await?;
            println!(
                "{} Saved item {} as {}",
                style("✓").green(),
                saved.description,
                saved.id.as_deref().unwrap_or("-")
            );
        }
        ItemsCommand::List => {
            let catalog = service.catalog().await?;
            if catalog.items.is_empty() {
                println!("{} No items saved", style("ℹ").blue());
            }
            for item in &catalog.items {
                println!(
                    "{}  {}  {}  tax {}%",
                    style(item.id.as_deref().unwrap_or("-")).dim(),
                    item.description,
                    format_currency_with(item.unit_price, symbol),
                    format_number(item.tax_percent)
                );
            }
        }
        ItemsCommand::Remove { id } => {
            service.remove_item(&id).await?;
            println!("{} Removed item {}", style("✓").green(), id);
        }
    }

    Ok(())
}
