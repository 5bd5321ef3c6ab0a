//! Mi Catálogo CLI - inspect the stored cart and the product API.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart stored by a storefront
//! mc-cli cart show --data-dir .mi-catalogo
//!
//! # Write the stored cart as JSON
//! mc-cli cart export -o cart.json
//!
//! # Empty the stored cart
//! mc-cli cart clear
//!
//! # List products from the product API
//! mc-cli catalog list --api-base http://127.0.0.1:5000
//! ```
//!
//! # Commands
//!
//! - `cart` - Read or reset the cart in local storage
//! - `catalog` - Query the remote product API

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mc-cli")]
#[command(author, version, about = "Mi Catálogo CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset the stored cart
    Cart {
        /// Local storage directory of the storefront
        #[arg(long, env = "CATALOG_DATA_DIR", default_value = ".mi-catalogo")]
        data_dir: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
    /// Query the product API
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines and total
    Show,
    /// Write the cart as JSON to a file, or stdout
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Empty the stored cart
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every product
    List {
        /// Product API base URL
        #[arg(long, env = "CATALOG_API_BASE")]
        api_base: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { data_dir, action } => match action {
            CartAction::Show => commands::cart::show(&data_dir)?,
            CartAction::Export { output } => commands::cart::export(&data_dir, output.as_deref())?,
            CartAction::Clear => commands::cart::clear(&data_dir)?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { api_base } => commands::catalog::list(&api_base).await?,
        },
    }
    Ok(())
}
