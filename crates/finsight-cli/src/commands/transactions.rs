//! Transaction command implementations

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use finsight_core::{aggregate, import::parse_date, BlobStore, NewTransaction, TransactionStore};
use uuid::Uuid;

use super::{rupees, short_id, truncate};

/// Parse a user-supplied date, defaulting to today
pub fn parse_date_arg(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => parse_date(s).with_context(|| format!("Invalid date '{}'", s)),
        None => Ok(Local::now().date_naive()),
    }
}

pub async fn cmd_add<B: BlobStore>(
    store: &TransactionStore<B>,
    date: Option<&str>,
    description: &str,
    amount: f64,
) -> Result<()> {
    let date = parse_date_arg(date)?;
    let tx = store
        .add(NewTransaction::new(date, description, amount))
        .await
        .context("Failed to add transaction")?;

    println!(
        "✅ Added {} │ {} │ {} │ {}",
        tx.date,
        rupees(tx.amount),
        tx.category,
        truncate(&tx.description, 40)
    );
    println!("   id: {}", tx.id);

    Ok(())
}

pub fn cmd_list<B: BlobStore>(
    store: &TransactionStore<B>,
    search: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let all = store.list();
    let matching = aggregate::filter_by_description(&all, search.unwrap_or(""));
    let shown: Vec<_> = matching.iter().take(limit).copied().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if all.is_empty() {
        println!("No transactions found. Add some with:");
        println!("  finsight add -D \"Groceries\" -a 850");
        println!("  finsight import --file expenses.csv");
        return Ok(());
    }

    if shown.is_empty() {
        println!("No transactions match '{}'.", search.unwrap_or(""));
        return Ok(());
    }

    println!();
    println!("📝 Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in &shown {
        println!(
            "   {} │ {} │ {:>12} │ {:<13} │ {}",
            short_id(&tx.id),
            tx.date,
            rupees(tx.amount),
            tx.category.as_str(),
            truncate(&tx.description, 35)
        );
    }

    let total: f64 = matching.iter().map(|tx| tx.amount).sum();
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Showing {} of {} │ Total: {}",
        shown.len(),
        matching.len(),
        rupees(total)
    );

    Ok(())
}

/// Resolve a full id or a unique id prefix
pub fn resolve_id<B: BlobStore>(store: &TransactionStore<B>, id: &str) -> Result<Uuid> {
    if let Ok(uuid) = id.parse::<Uuid>() {
        return Ok(uuid);
    }

    let prefix = id.trim().to_lowercase();
    if prefix.is_empty() {
        anyhow::bail!("Transaction id must not be empty");
    }

    let matches: Vec<Uuid> = store
        .list()
        .iter()
        .map(|tx| tx.id)
        .filter(|uuid| uuid.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [only] => Ok(*only),
        [] => anyhow::bail!("Transaction {} not found", id),
        _ => anyhow::bail!(
            "Id prefix '{}' matches {} transactions, use more characters",
            id,
            matches.len()
        ),
    }
}

pub fn cmd_delete<B: BlobStore>(store: &TransactionStore<B>, id: &str) -> Result<()> {
    let uuid = resolve_id(store, id)?;

    if store.remove(uuid).context("Failed to delete transaction")? {
        println!("🗑️  Deleted transaction {}", uuid);
    } else {
        println!("No transaction with id {} (nothing changed).", uuid);
    }

    Ok(())
}
