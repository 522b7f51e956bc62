//! Green Vitality CLI - Cart and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! gv-cli cart add --sku A1 --name "Tulsi Tea" --price 500 --catalog Herbs
//!
//! # Show the cart
//! gv-cli cart show
//!
//! # Print the WhatsApp order link
//! gv-cli cart order --phone 919876543210
//!
//! # List catalogs
//! gv-cli catalogs catalogs.json
//! ```
//!
//! # Commands
//!
//! - `cart add|set|remove|show|order` - Manage the file-backed cart
//! - `catalogs` - List visible catalogs by category

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gvcatalogs_core::{MINIMUM_ORDER, Product};
use gvcatalogs_storefront::store::{CartStore, FileBlobStore};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "gv-cli")]
#[command(author, version, about = "Green Vitality CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        /// Directory holding the cart blob
        #[arg(long, env = "GV_CART_DIR", default_value = ".gvcatalogs")]
        dir: PathBuf,

        /// Minimum order value
        #[arg(long, env = "MINIMUM_ORDER", default_value_t = MINIMUM_ORDER)]
        minimum: Decimal,

        #[command(subcommand)]
        action: CartAction,
    },
    /// List visible catalogs grouped by category
    Catalogs {
        /// Catalog list JSON file
        #[arg(default_value = "catalogs.json")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        #[arg(long)]
        sku: String,

        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Catalog the product was picked from
        #[arg(long)]
        catalog: String,

        #[arg(long, default_value = "")]
        image: String,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        #[arg(long)]
        sku: String,

        #[arg(long)]
        catalog: String,

        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        #[arg(long)]
        sku: String,

        #[arg(long)]
        catalog: String,
    },
    /// Show the cart grouped by catalog
    Show,
    /// Print the order summary and WhatsApp link
    Order {
        /// Recipient phone number (omit to pick a contact in WhatsApp)
        #[arg(long, env = "ORDER_WHATSAPP_NUMBER")]
        phone: Option<String>,
    },
}

fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing; logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli).and_then(|output| {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{output}")?;
        Ok(())
    });

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let output = match cli.command {
        Commands::Cart {
            dir,
            minimum,
            action,
        } => {
            let mut store = CartStore::new(FileBlobStore::new(dir));
            match action {
                CartAction::Add {
                    sku,
                    name,
                    price,
                    catalog,
                    image,
                } => {
                    let product = Product::new(sku, name, price, image);
                    commands::cart::add(&mut store, &product, &catalog)?
                }
                CartAction::Set {
                    sku,
                    catalog,
                    quantity,
                } => commands::cart::set(&mut store, &sku, &catalog, quantity, minimum)?,
                CartAction::Remove { sku, catalog } => {
                    commands::cart::remove(&mut store, &sku, &catalog, minimum)?
                }
                CartAction::Show => commands::cart::show(&store, minimum)?,
                CartAction::Order { phone } => {
                    commands::cart::order(store, phone.as_deref(), minimum)?
                }
            }
        }
        Commands::Catalogs { path } => commands::catalogs::list(&path)?,
    };
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_minimum_applies_to_every_cart_action() {
        for action in ["set", "remove"] {
            let mut args = vec!["gv-cli", "cart", "--minimum", "2000", action, "--sku", "A1", "--catalog", "Herbs"];
            if action == "set" {
                args.extend(["--quantity", "2"]);
            }
            let cli = Cli::try_parse_from(args).unwrap();
            let Commands::Cart { minimum, .. } = cli.command else {
                panic!("expected cart command");
            };
            assert_eq!(minimum, Decimal::from(2000));
        }
    }
}
