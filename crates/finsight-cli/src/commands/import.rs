//! CSV import command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::{BlobStore, ImportSummary, TransactionStore};

use super::{rupees, truncate};

pub async fn cmd_import<B: BlobStore>(store: &TransactionStore<B>, file: &Path) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());

    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if store.classifier().ai().is_none() {
        println!("   💡 Tip: Set GEMINI_API_KEY to categorize imported transactions");
    }

    let summary = store
        .import_csv(&text)
        .await
        .context("Failed to import transactions")?;

    print_import_summary(&summary);
    Ok(())
}

pub fn print_import_summary(summary: &ImportSummary) {
    let total: f64 = summary.imported.iter().map(|tx| tx.amount).sum();

    println!();
    println!("📊 Import Results");
    println!("   ─────────────────────────────");
    println!("   Imported: {} ({})", summary.imported.len(), rupees(total));
    println!("   Skipped:  {}", summary.skipped.len());

    for skipped in &summary.skipped {
        println!(
            "   ⚠️  line {}: {} ({})",
            skipped.line,
            truncate(&skipped.content, 40),
            skipped.reason
        );
    }

    if summary.imported.is_empty() {
        println!();
        println!("No transactions imported. Expected lines like:");
        println!("  2024-01-15,Groceries,850");
    } else {
        println!();
        println!("✅ Import complete. Run 'finsight dashboard' to see the overview.");
    }
}
