//! Integration tests for finsight-core
//!
//! These tests exercise the full add/import → store → aggregate workflow
//! against a real SQLite file.

use chrono::NaiveDate;
use finsight_core::{
    aggregate, AIClient, Category, Classifier, Dashboard, Database, ImportOptions, MockBackend,
    NewTransaction, Summarizer, TransactionStore, STORAGE_KEY,
};
use tempfile::TempDir;
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sqlite_store(dir: &TempDir, ai: Option<AIClient>) -> TransactionStore<Database> {
    let db = Database::new(dir.path().join("finsight.db")).expect("Failed to open database");
    TransactionStore::new(db, Classifier::new(ai))
}

/// Sample import with one malformed amount
fn sample_csv() -> &'static str {
    "Date,Description,Amount
2024-01-01,Rent,1000
2024-01-02,Food,200
2024-01-02,Lunch,twelve
2024-01-02,Food,50
"
}

// =============================================================================
// End-to-end
// =============================================================================

#[tokio::test]
async fn test_end_to_end_trend_and_distribution() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir, Some(AIClient::mock()));

    let summary = store.import_csv(sample_csv()).await.unwrap();
    assert_eq!(summary.imported.len(), 3);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].line, 4);

    let trend = store.spending_trend();
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[0].full_date, date("2024-01-01"));
    assert_eq!(trend[0].amount, 1000.0);
    assert_eq!(trend[1].full_date, date("2024-01-02"));
    assert_eq!(trend[1].amount, 250.0);

    let dist = store.category_distribution();
    assert_eq!(dist.len(), 2);
    assert_eq!(dist[0].name, Category::Rent);
    assert_eq!(dist[0].value, 1000.0);
    assert_eq!(dist[0].transactions.len(), 1);
    assert_eq!(dist[1].name, Category::Food);
    assert_eq!(dist[1].value, 250.0);
    assert_eq!(dist[1].transactions.len(), 2);
}

#[tokio::test]
async fn test_sums_agree_across_views() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir, Some(AIClient::mock()));
    store.import_csv(sample_csv()).await.unwrap();
    store
        .add(NewTransaction::new(date("2024-02-10"), "Netflix", 649.0))
        .await
        .unwrap();

    let dashboard = Dashboard::load(&store);
    let total = aggregate::total_spending(&dashboard.transactions);
    let trend_sum: f64 = dashboard.trend.iter().map(|p| p.amount).sum();
    let dist_sum: f64 = dashboard.distribution.iter().map(|g| g.value).sum();

    assert_eq!(total, 1899.0);
    assert_eq!(trend_sum, total);
    assert_eq!(dist_sum, total);
    for pair in dashboard.distribution.windows(2) {
        assert!(pair[0].value >= pair[1].value);
    }
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let added = {
        let store = sqlite_store(&dir, Some(AIClient::mock()));
        store
            .add(NewTransaction::new(date("2024-03-01"), "Amazon", 999.0))
            .await
            .unwrap()
    };

    let store = sqlite_store(&dir, None);
    let listed = store.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], added);
    assert_eq!(listed[0].category, Category::Shopping);
}

#[tokio::test]
async fn test_delete_unknown_id_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir, Some(AIClient::mock()));
    store.import_csv(sample_csv()).await.unwrap();

    let before = store.raw().unwrap().expect("ledger should be stored");
    assert!(!store.remove(Uuid::new_v4()).unwrap());
    let after = store.raw().unwrap().expect("ledger should still be stored");
    assert_eq!(before.as_bytes(), after.as_bytes());
}

#[tokio::test]
async fn test_corrupt_blob_reads_as_empty() {
    use finsight_core::BlobStore;

    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir, None);
    store.blobs().set(STORAGE_KEY, "[{\"id\": 42}").unwrap();
    assert!(store.list().is_empty());

    // A later write replaces the corrupt value
    store
        .add(NewTransaction::new(date("2024-01-01"), "Rent", 1000.0))
        .await
        .unwrap();
    assert_eq!(store.list().len(), 1);
}

// =============================================================================
// Fallback behaviour
// =============================================================================

#[tokio::test]
async fn test_import_without_ai_classifies_as_other() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir, None);

    let summary = store.import_csv(sample_csv()).await.unwrap();
    assert!(summary
        .imported
        .iter()
        .all(|t| t.category == Category::Other));

    let dist = store.category_distribution();
    assert_eq!(dist.len(), 1);
    assert_eq!(dist[0].value, 1250.0);
}

#[tokio::test]
async fn test_import_with_failing_ai_still_persists() {
    let dir = TempDir::new().unwrap();
    let mock = MockBackend::failing();
    let store = sqlite_store(&dir, Some(AIClient::Mock(mock.clone()))).with_options(
        ImportOptions {
            classify_concurrency: 2,
        },
    );

    let summary = store.import_csv(sample_csv()).await.unwrap();
    assert_eq!(summary.imported.len(), 3);
    assert_eq!(mock.categorize_calls(), 3);
    assert_eq!(store.list().len(), 3);
}

#[tokio::test]
async fn test_insights_for_stored_ledger() {
    let dir = TempDir::new().unwrap();
    let store = sqlite_store(&dir, Some(AIClient::mock()));
    let summarizer = Summarizer::new(Some(AIClient::mock()));

    let empty = summarizer.summarize(&store.list()).await;
    assert_eq!(empty.summary, "Add more data for AI analysis.");

    store.import_csv(sample_csv()).await.unwrap();
    let insights = summarizer.summarize(&store.list()).await;
    assert!(insights.summary.contains("Rent"));
    assert!(!insights.tips.is_empty() && insights.tips.len() <= 3);
}
