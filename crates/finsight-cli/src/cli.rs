//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// FinSight - Track expenses and see where the money goes
#[derive(Parser)]
#[command(name = "finsight")]
#[command(about = "Personal finance tracker with AI categorization and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides config.toml)
    #[arg(long, global = true, env = "FINSIGHT_DB")]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record a transaction (categorized automatically)
    Add {
        /// Transaction date (YYYY-MM-DD, MM/DD/YYYY or MM/DD/YY; default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// What the money was spent on
        #[arg(short = 'D', long)]
        description: String,

        /// Amount spent (non-negative)
        #[arg(short, long)]
        amount: f64,
    },

    /// List transactions, newest first
    List {
        /// Only show transactions whose description contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a transaction by id (or unique id prefix)
    Delete {
        /// Transaction id
        id: String,
    },

    /// Import transactions from a `date,description,amount` CSV file
    Import {
        /// CSV file to import (first line is treated as a header)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show spending per day
    Trend {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show spending per category
    Categories {
        /// List the transactions in each category
        #[arg(short, long)]
        expand: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate an AI summary of your spending
    Insights {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show totals, trend, categories and insights together
    Dashboard,

    /// Show which AI backend is configured and whether it is reachable
    AiStatus,

    /// Delete all transactions
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive session with live, debounced insights
    Shell {
        /// Keep everything in memory (nothing is saved)
        #[arg(long)]
        ephemeral: bool,
    },
}
