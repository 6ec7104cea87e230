//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Record expenses from minimal input, let the model fill in the rest
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "AI-assisted expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to tally.db in the data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record a transaction (classified automatically)
    Add {
        /// Amount spent or received (e.g. 25.50)
        amount: String,

        /// What the transaction was for
        #[arg(short, long)]
        description: Option<String>,

        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,

        /// Where it happened
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Record a transaction from just an amount
    Quick {
        /// Amount (e.g. 25.50)
        amount: String,
    },

    /// List recent transactions
    List {
        /// Maximum number to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Search transactions by keyword (description or merchant)
    Search {
        /// Keyword to search for
        keyword: String,
    },

    /// Show income/expense statistics for a date window
    Stats {
        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Window end (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Show database status and AI backend health
    Status,
}
