//! PulsePack CLI - catalog checks and state replay.
//!
//! # Usage
//!
//! ```bash
//! # Check a catalog file before deploying it
//! pp-cli catalog validate content/catalog.json
//!
//! # Show the products a catalog file defines
//! pp-cli catalog list content/catalog.json
//!
//! # Run a recorded list of actions through the state container
//! pp-cli replay session.json --catalog content/catalog.json
//! ```
//!
//! # Commands
//!
//! - `catalog validate` - Parse and validate a catalog
//! - `catalog list` - List products grouped by category
//! - `replay` - Dispatch recorded actions and summarize the final state

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pp-cli")]
#[command(author, version, about = "PulsePack CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect catalog files
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Replay recorded storefront actions
    Replay {
        /// JSON file holding a list of steps
        steps: PathBuf,

        /// Catalog that `add_to_cart` product ids resolve against
        #[arg(short, long)]
        catalog: PathBuf,

        /// Location the visitor arrived at, e.g. `/payment/status?order_id=x`
        #[arg(short, long)]
        arrive: Option<String>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Parse and validate a catalog file
    Validate {
        /// Catalog JSON file
        path: PathBuf,
    },
    /// List the products in a catalog file
    List {
        /// Catalog JSON file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => commands::catalog::validate(&path).await?,
            CatalogAction::List { path } => commands::catalog::list(&path).await?,
        },
        Commands::Replay {
            steps,
            catalog,
            arrive,
        } => commands::replay::run(&steps, &catalog, arrive.as_deref()).await?,
    }
    Ok(())
}
