//! FinSight CLI - Personal finance tracker
//!
//! Usage:
//!   finsight init                          Initialize database
//!   finsight add -D "Netflix" -a 649       Record a transaction
//!   finsight import --file expenses.csv    Import transactions
//!   finsight dashboard                     Totals, trend, categories, insights
//!   finsight shell                         Interactive session

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use finsight_core::{AIClient, Classifier, MemoryBlobStore, Summarizer, TransactionStore};
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

    let config = commands::load_config()?;
    let db_path = config.db_path(cli.db.as_deref());

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Add {
            date,
            description,
            amount,
        } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_add(&store, date.as_deref(), &description, amount).await
        }
        Commands::List {
            search,
            limit,
            json,
        } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_list(&store, search.as_deref(), limit, json)
        }
        Commands::Delete { id } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_delete(&store, &id)
        }
        Commands::Import { file } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_import(&store, &file).await
        }
        Commands::Trend { json } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_trend(&store, json)
        }
        Commands::Categories { expand, json } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_categories(&store, expand, json)
        }
        Commands::Insights { json } => {
            let store = commands::open_store(&db_path, &config)?;
            let summarizer = Summarizer::new(AIClient::from_env());
            commands::cmd_insights(&store, &summarizer, json).await
        }
        Commands::Dashboard => {
            let store = commands::open_store(&db_path, &config)?;
            let summarizer = Summarizer::new(AIClient::from_env());
            commands::cmd_dashboard(&store, &summarizer).await
        }
        Commands::AiStatus => commands::cmd_ai_status(AIClient::from_env().as_ref()).await,
        Commands::Reset { yes } => {
            let store = commands::open_store(&db_path, &config)?;
            commands::cmd_reset(&store, yes)
        }
        Commands::Shell { ephemeral } => {
            let ai = AIClient::from_env();
            let summarizer = Summarizer::new(ai.clone());
            if ephemeral {
                let store = TransactionStore::new(MemoryBlobStore::new(), Classifier::new(ai))
                    .with_options(config.import_options());
                commands::cmd_shell(&store, summarizer, config.debounce()).await
            } else {
                let store = commands::open_store(&db_path, &config)?;
                commands::cmd_shell(&store, summarizer, config.debounce()).await
            }
        }
    }
}
