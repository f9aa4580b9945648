//! `stockbook`: inventory and sales tracking for a small clothing store.
//!
//! Reads the product table and sales ledger, registers stock adjustments and
//! sales, and prints sales statistics.

mod commands;

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use stockbook_infra::store::csv_ledger::parse_timestamp;
use stockbook_infra::{InventoryEngine, StoreConfig};
use stockbook_inventory::Direction;

/// Stockbook CLI.
#[derive(Parser, Debug)]
#[command(name = "stockbook", about = "Inventory and sales tracking")]
struct Cli {
    /// Product table (CSV). Overrides STOCKBOOK_CATALOG_PATH
    /// (default: base_datos_productos.csv).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Sales ledger (CSV). Overrides STOCKBOOK_LEDGER_PATH (default: ventas.csv).
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List products, optionally filtered.
    Catalog {
        #[arg(long)]
        family: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        size: Option<String>,
        /// Substring of the code or family (case-insensitive).
        #[arg(long)]
        search: Option<String>,
    },

    /// Add or remove stock for a product.
    Adjust {
        code: String,
        quantity: u64,
        /// increase | decrease
        #[arg(long, short = 'd')]
        direction: Direction,
    },

    /// Register a sale.
    Sell {
        code: String,
        quantity: u64,
        /// Whatsapp, Instagram, Showroom, Shopify or PointOfSale.
        channel: String,
        /// Sale time, e.g. "2024-11-20 15:30:00" (default: now).
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },

    /// List recorded sales.
    Sales,

    /// Sales statistics.
    Stats {
        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn parse_at(raw: &str) -> Result<NaiveDateTime, String> {
    parse_timestamp(raw).ok_or_else(|| format!("unrecognized date/time: {raw}"))
}

fn main() -> anyhow::Result<()> {
    stockbook_observability::init();

    let cli = Cli::parse();
    let mut config = StoreConfig::from_env();
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    if let Some(path) = cli.ledger {
        config.ledger_path = path;
    }
    let mut engine = InventoryEngine::open_csv(&config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Catalog {
            family,
            color,
            size,
            search,
        } => {
            let query = commands::catalog::CatalogQuery {
                family,
                color,
                size,
                search,
            };
            commands::catalog::list(&mut out, engine.catalog(), &query)?;
        }

        Commands::Adjust {
            code,
            quantity,
            direction,
        } => {
            commands::stock::adjust(&mut out, &mut engine, &code, quantity, direction)?;
        }

        Commands::Sell {
            code,
            quantity,
            channel,
            at,
        } => {
            let at = at.unwrap_or_else(|| chrono::Local::now().naive_local());
            commands::stock::sell(&mut out, &mut engine, &code, quantity, &channel, at)?;
        }

        Commands::Sales => {
            commands::sales::list(&mut out, engine.ledger())?;
        }

        Commands::Stats { json } => {
            let stats = engine.statistics();
            if json {
                commands::stats::print_json(&mut out, &stats.report())?;
            } else {
                commands::stats::print_summary(&mut out, &stats)?;
            }
        }
    }

    Ok(())
}
