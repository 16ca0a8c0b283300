//! One consistent view of the ledger and its derived charts

use serde::Serialize;

use crate::aggregate;
use crate::db::BlobStore;
use crate::models::{CategoryDataPoint, Transaction, TrendDataPoint};
use crate::store::TransactionStore;

/// Ledger plus derived views, all computed from the same snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub transactions: Vec<Transaction>,
    pub trend: Vec<TrendDataPoint>,
    pub distribution: Vec<CategoryDataPoint>,
    pub total: f64,
}

impl Dashboard {
    /// Read the store once and derive every view from that read
    pub fn load<B: BlobStore>(store: &TransactionStore<B>) -> Self {
        Self::from_transactions(store.list())
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let trend = aggregate::spending_trend(&transactions);
        let distribution = aggregate::category_distribution(&transactions);
        let total = aggregate::total_spending(&transactions);
        Self {
            transactions,
            trend,
            distribution,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transactions whose description contains `term` (case-insensitive)
    pub fn search(&self, term: &str) -> Vec<&Transaction> {
        aggregate::filter_by_description(&self.transactions, term)
    }
}
