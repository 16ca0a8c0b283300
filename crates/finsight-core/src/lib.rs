//! FinSight Core Library
//!
//! Shared functionality for the FinSight personal finance tracker:
//! - Transaction store persisted as a single blob (SQLite or in-memory)
//! - Aggregation engine for the trend and category views
//! - CSV import with per-line skip reporting
//! - Pluggable AI backends (Gemini, OpenAI-compatible, mock) for
//!   categorization and spending insights, with safe fallbacks
//! - Debounced insights recomputation
//! - Optional TOML configuration

pub mod aggregate;
pub mod ai;
pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod prompts;
pub mod store;

/// Test utilities including a mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, BackendInfo, CategoryTotals, GeminiBackend, MockBackend,
    OpenAICompatibleBackend, SpendingSummary,
};
pub use classifier::Classifier;
pub use config::Config;
pub use dashboard::Dashboard;
pub use db::{BlobStore, Database, MemoryBlobStore};
pub use error::{Error, Result};
pub use import::{ImportSummary, SkippedLine};
pub use insights::{InsightsDebouncer, Summarizer};
pub use models::{
    Category, CategoryDataPoint, Insights, NewTransaction, Transaction, TrendDataPoint,
};
pub use prompts::{PromptId, PromptLibrary};
pub use store::{ImportOptions, TransactionStore, STORAGE_KEY};
