//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track spending and build better habits
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal finance tracker with behavioral coaching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

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

    /// Behavior config file (defaults to ~/.local/share/tally/config/behavior.toml,
    /// then to the built-in thresholds)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User the records belong to
    ///
    /// The web server stores records under the authenticated email; pass the
    /// same value here to work on that user's data.
    #[arg(long, default_value = "local-dev", global = true)]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires Cloudflare Access authentication headers.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List and manage transactions
    Transactions {
        #[command(subcommand)]
        action: Option<TransactionsAction>,
    },

    /// List and manage monthly budgets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show the spending streak
    Streak {
        /// Evaluate a day (YYYY-MM-DD) before showing the streak
        #[arg(long)]
        evaluate: Option<String>,
    },

    /// Show regret scores
    Scores {
        /// Window: day, month, all
        #[arg(short, long, default_value = "all")]
        duration: String,
    },

    /// Show or generate the monthly letter
    Letter {
        /// Month to (re)generate the letter for (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// List stored letters instead
        #[arg(long, conflicts_with = "month")]
        archive: bool,
    },

    /// Show the income/expense trend, category totals and regret stats
    Report {
        /// Number of trailing months in the trend (default from config)
        #[arg(short, long)]
        months: Option<u32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List transactions, newest first
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
    /// Log a transaction
    Add {
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        /// Amount (positive)
        #[arg(short, long)]
        amount: f64,

        /// Category
        #[arg(short, long)]
        category: String,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Day of the transaction (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Recurrence: daily, weekly, monthly, yearly
        #[arg(long)]
        recurring: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: i64,
    },
    /// Record how you feel about an expense: "Worth it", Neutral, Regret
    Regret {
        /// Transaction ID
        id: i64,

        /// Verdict
        status: String,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets
    List {
        /// Only this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Create or replace a category budget
    Set {
        /// Category
        category: String,

        /// Monthly limit
        limit: f64,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}
