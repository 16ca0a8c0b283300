//! Mock backend for testing
//!
//! Keyword-based labels and a canned summary. Useful for unit tests and for
//! running the CLI without network access (`AI_BACKEND=mock`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{CategoryTotals, SpendingSummary};
use super::AIBackend;

/// Mock AI backend for testing
///
/// Returns predictable responses. Can be switched into a failing mode or
/// given a fixed summary payload, and counts the calls it receives.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether every request should fail
    pub failing: bool,
    /// Fixed payload returned by `summarize_spending`
    pub summary: Option<SpendingSummary>,
    categorize_calls: Arc<AtomicUsize>,
    summarize_calls: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Mock whose requests all fail, as if the service were down
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// Mock that answers summaries with a fixed payload
    pub fn with_summary(summary: SpendingSummary) -> Self {
        Self {
            healthy: true,
            summary: Some(summary),
            ..Default::default()
        }
    }

    /// Number of `categorize_transaction` calls so far (shared across clones)
    pub fn categorize_calls(&self) -> usize {
        self.categorize_calls.load(Ordering::SeqCst)
    }

    /// Number of `summarize_spending` calls so far (shared across clones)
    pub fn summarize_calls(&self) -> usize {
        self.summarize_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn label_for(description: &str) -> &'static str {
        match description.to_uppercase().as_str() {
            d if d.contains("NETFLIX") || d.contains("SPOTIFY") || d.contains("PRIME") => {
                "Subscriptions"
            }
            d if d.contains("FOOD")
                || d.contains("ZOMATO")
                || d.contains("SWIGGY")
                || d.contains("GROCER")
                || d.contains("RESTAURANT")
                || d.contains("CAFE") =>
            {
                "Food"
            }
            d if d.contains("RENT") || d.contains("LANDLORD") => "Rent",
            d if d.contains("UBER")
                || d.contains("OLA")
                || d.contains("FLIGHT")
                || d.contains("TRAIN")
                || d.contains("FUEL") =>
            {
                "Travel"
            }
            d if d.contains("ELECTRIC")
                || d.contains("WATER")
                || d.contains("BROADBAND")
                || d.contains("GAS BILL") =>
            {
                "Utilities"
            }
            d if d.contains("AMAZON") || d.contains("FLIPKART") || d.contains("MYNTRA") => {
                "Shopping"
            }
            d if d.contains("MOVIE") || d.contains("CINEMA") || d.contains("CONCERT") => {
                "Entertainment"
            }
            _ => "Other",
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn categorize_transaction(&self, description: &str, _amount: f64) -> Result<String> {
        self.categorize_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::InvalidData("Mock backend failure".into()));
        }
        Ok(Self::label_for(description).to_string())
    }

    async fn summarize_spending(&self, totals: &CategoryTotals) -> Result<SpendingSummary> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(Error::InvalidData("Mock backend failure".into()));
        }
        if let Some(ref summary) = self.summary {
            return Ok(summary.clone());
        }

        let top = totals
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(category, amount)| format!("{} leads at ₹{:.2}", category, amount))
            .unwrap_or_else(|| "No spending recorded".to_string());

        Ok(SpendingSummary {
            summary: Some(format!(
                "You spent across {} categories. {}.",
                totals.len(),
                top
            )),
            tips: Some(vec![
                "Review your largest category first.".to_string(),
                "Set a monthly budget per category.".to_string(),
                "Cancel subscriptions you no longer use.".to_string(),
            ]),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
