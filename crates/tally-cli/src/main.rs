//! Tally CLI - AI-assisted expense tracker
//!
//! Usage:
//!   tally init                  Initialize database
//!   tally quick 25.50           Record a transaction from just an amount
//!   tally add 25.50 -d "lunch"  Record with details
//!   tally list                  Show recent transactions
//!   tally serve --port 3000     Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path, cli.no_encrypt),
        Commands::Add {
            amount,
            description,
            merchant,
            location,
        } => {
            commands::cmd_add(
                &db_path,
                &amount,
                description,
                merchant,
                location,
                cli.no_encrypt,
            )
            .await
        }
        Commands::Quick { amount } => {
            commands::cmd_add(&db_path, &amount, None, None, None, cli.no_encrypt).await
        }
        Commands::List { limit } => commands::cmd_list(&db_path, limit, cli.no_encrypt),
        Commands::Search { keyword } => commands::cmd_search(&db_path, &keyword, cli.no_encrypt),
        Commands::Stats { from, to } => commands::cmd_stats(&db_path, &from, &to, cli.no_encrypt),
        Commands::Serve { port, host } => {
            commands::cmd_serve(&db_path, &host, port, cli.no_encrypt).await
        }
        Commands::Status => commands::cmd_status(&db_path, cli.no_encrypt).await,
    }
}
