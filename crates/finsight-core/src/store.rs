//! Transaction store
//!
//! The whole ledger lives as one JSON array under a fixed key in a
//! [`BlobStore`]. Every mutation reads the collection, changes it in memory
//! and writes the full array back; the last writer wins.

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate;
use crate::classifier::Classifier;
use crate::db::BlobStore;
use crate::error::{Error, Result};
use crate::import::{parse_csv_text, ImportSummary};
use crate::models::{CategoryDataPoint, NewTransaction, Transaction, TrendDataPoint};

/// Key holding the serialized ledger
pub const STORAGE_KEY: &str = "finsight_transactions";

/// Tuning for bulk classification
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Classifier calls allowed in flight at once (minimum 1)
    pub classify_concurrency: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            classify_concurrency: 1,
        }
    }
}

/// Persisted, ordered collection of transactions
pub struct TransactionStore<B: BlobStore> {
    blobs: B,
    classifier: Classifier,
    options: ImportOptions,
}

impl<B: BlobStore> TransactionStore<B> {
    pub fn new(blobs: B, classifier: Classifier) -> Self {
        Self {
            blobs,
            classifier,
            options: ImportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The serialized ledger exactly as stored
    pub fn raw(&self) -> Result<Option<String>> {
        self.blobs.get(STORAGE_KEY)
    }

    /// All transactions, newest date first
    ///
    /// Equal dates keep their stored order. A missing, unreadable or corrupt
    /// blob reads as an empty ledger.
    pub fn list(&self) -> Vec<Transaction> {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read transactions, treating ledger as empty");
            Vec::new()
        })
    }

    /// The ledger as the write paths see it
    ///
    /// Storage errors propagate so a failed read never overwrites the saved
    /// ledger. A missing or corrupt blob is still an empty ledger.
    fn load(&self) -> Result<Vec<Transaction>> {
        let Some(raw) = self.blobs.get(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        let mut transactions: Vec<Transaction> = match serde_json::from_str(&raw) {
            Ok(txs) => txs,
            Err(e) => {
                warn!(error = %e, "Stored transactions are corrupt, treating ledger as empty");
                Vec::new()
            }
        };

        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// Record a new transaction, classifying it first
    pub async fn add(&self, new: NewTransaction) -> Result<Transaction> {
        new.validate().map_err(Error::InvalidData)?;

        let category = self
            .classifier
            .classify(new.description.trim(), new.amount)
            .await;
        let tx = new.into_transaction(category);

        let mut transactions = self.load()?;
        transactions.insert(0, tx.clone());
        self.save(&transactions)?;

        info!(id = %tx.id, category = %tx.category, amount = tx.amount, "Added transaction");
        Ok(tx)
    }

    /// Delete the transaction with `id`
    ///
    /// Returns false (and writes nothing) if no such transaction exists.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let transactions = self.load()?;
        if !transactions.iter().any(|tx| tx.id == id) {
            debug!(%id, "No transaction to remove");
            return Ok(false);
        }

        let remaining: Vec<Transaction> =
            transactions.into_iter().filter(|tx| tx.id != id).collect();
        self.save(&remaining)?;

        info!(%id, "Removed transaction");
        Ok(true)
    }

    /// Classify and persist a batch in a single write
    ///
    /// New records land ahead of existing ones, in input order.
    pub async fn bulk_import(&self, records: Vec<NewTransaction>) -> Result<Vec<Transaction>> {
        for (i, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|e| Error::InvalidData(format!("record {}: {}", i + 1, e)))?;
        }
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = self.options.classify_concurrency.max(1);
        let classifier = &self.classifier;
        let imported: Vec<Transaction> = stream::iter(records)
            .map(|record| async move {
                let category = classifier
                    .classify(record.description.trim(), record.amount)
                    .await;
                record.into_transaction(category)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let existing = self.load()?;
        let mut combined = Vec::with_capacity(imported.len() + existing.len());
        combined.extend(imported.iter().cloned());
        combined.extend(existing);
        self.save(&combined)?;

        info!(count = imported.len(), "Imported transactions");
        Ok(imported)
    }

    /// Parse import text and persist every well-formed line
    pub async fn import_csv(&self, text: &str) -> Result<ImportSummary> {
        let parsed = parse_csv_text(text)?;
        for skipped in &parsed.skipped {
            warn!(line = skipped.line, reason = %skipped.reason, "Skipped import line");
        }

        let imported = self.bulk_import(parsed.records).await?;
        Ok(ImportSummary {
            imported,
            skipped: parsed.skipped,
        })
    }

    /// Daily totals over the current ledger
    pub fn spending_trend(&self) -> Vec<TrendDataPoint> {
        aggregate::spending_trend(&self.list())
    }

    /// Category totals over the current ledger
    pub fn category_distribution(&self) -> Vec<CategoryDataPoint> {
        aggregate::category_distribution(&self.list())
    }

    /// Drop the whole ledger
    pub fn clear(&self) -> Result<()> {
        self.blobs.remove(STORAGE_KEY)?;
        info!("Cleared all transactions");
        Ok(())
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        let raw = serde_json::to_string(transactions)?;
        self.blobs.set(STORAGE_KEY, &raw)
    }
}
