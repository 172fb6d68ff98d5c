//! Bazaar CLI - Database setup and inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the unique email index on the users collection
//! bazaar-cli indexes
//!
//! # Dump users (id, name, email) as JSON
//! bazaar-cli users list
//!
//! # Dump recorded orders as JSON, oldest first
//! bazaar-cli orders list
//! ```
//!
//! Reads the same environment (`MONGO_URI`, `MONGO_DATABASE`,
//! `STORE_TIMEOUT_SECS`, `.env`) as the API server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure collection indexes exist
    Indexes,
    /// Inspect users
    Users {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: ListAction,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// Print every record as JSON
    List,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_cli=info,bazaar_api=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Indexes => commands::indexes::ensure().await,
        Commands::Users {
            action: ListAction::List,
        } => commands::users::list().await,
        Commands::Orders {
            action: ListAction::List,
        } => commands::orders::list().await,
    }
}
