//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` / `open_db` / `open_store` - Shared setup
//! - `cmd_init` - Initialize the database
//! - `cmd_reset` - Delete all transactions
//! - `cmd_ai_status` - Show the configured AI backend

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::{
    AIBackend, AIClient, BlobStore, Classifier, Config, Database, TransactionStore,
};

/// Load config.toml (defaults if absent)
pub fn load_config() -> Result<Config> {
    Config::load().context("Failed to load config")
}

/// Open (and create if needed) the database
pub fn open_db(db_path: &Path) -> Result<Database> {
    Database::new(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Open the transaction store with the environment-selected classifier
pub fn open_store(db_path: &Path, config: &Config) -> Result<TransactionStore<Database>> {
    let db = open_db(db_path)?;
    Ok(TransactionStore::new(db, Classifier::from_env()).with_options(config.import_options()))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    match AIClient::from_env() {
        Some(ai) => {
            let info = ai.info();
            println!("   🤖 AI backend: {} ({})", info.kind, info.model);
        }
        None => {
            println!("   💡 Tip: Set GEMINI_API_KEY for automatic categorization and insights");
        }
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a transaction: finsight add -D \"Groceries\" -a 850");
    println!("  2. Import a file:     finsight import --file expenses.csv");
    println!("  3. See the overview:  finsight dashboard");

    Ok(())
}

/// Delete every transaction (asks first unless `yes`)
pub fn cmd_reset<B: BlobStore>(store: &TransactionStore<B>, yes: bool) -> Result<()> {
    let count = store.list().len();

    if !yes {
        print!("⚠️  This will delete all {} transactions.\n\n", count);
        print!("Are you sure? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.clear().context("Failed to clear transactions")?;
    println!("✅ Deleted {} transactions.", count);

    Ok(())
}

pub async fn cmd_ai_status(ai: Option<&AIClient>) -> Result<()> {
    println!();
    println!("🤖 AI Backend");
    println!("   ─────────────────────────────");

    let Some(ai) = ai else {
        println!("   Status: not configured");
        println!();
        println!("   Transactions will be categorized as Other and insights show");
        println!("   placeholder text until a backend is configured:");
        println!("     GEMINI_API_KEY=...              (Gemini, default)");
        println!("     AI_BACKEND=openai_compatible OPENAI_COMPATIBLE_HOST=...");
        println!("     AI_BACKEND=mock                 (offline keyword matcher)");
        return Ok(());
    };

    let info = ai.info();
    println!("   Backend: {}", info.kind);
    println!("   Model:   {}", info.model);
    println!("   Host:    {}", info.host);

    if ai.health_check().await {
        println!("   Status:  ✅ reachable");
    } else {
        println!("   Status:  ❌ unreachable (falling back to defaults)");
    }

    Ok(())
}
