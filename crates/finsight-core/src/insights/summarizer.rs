use tracing::{debug, warn};

use crate::aggregate::category_totals;
use crate::ai::{AIBackend, AIClient, SpendingSummary};
use crate::models::{Insights, Transaction};

pub const EMPTY_SUMMARY: &str = "Add more data for AI analysis.";
pub const EMPTY_TIP: &str = "Track daily to improve accuracy.";
pub const MISSING_SUMMARY: &str = "No summary available.";
pub const MISSING_TIP: &str = "Keep tracking!";
pub const FAILED_SUMMARY: &str = "Insights temporarily unavailable.";
pub const FAILED_TIP: &str = "Please check back later.";

const MAX_TIPS: usize = 3;

/// Produces [`Insights`] for a set of transactions
///
/// Never fails: every problem maps onto one of the fixed fallback texts.
#[derive(Clone, Default)]
pub struct Summarizer {
    ai: Option<AIClient>,
}

impl Summarizer {
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    pub async fn summarize(&self, transactions: &[Transaction]) -> Insights {
        let Some(ref ai) = self.ai else {
            return placeholder();
        };
        if transactions.is_empty() {
            return placeholder();
        }

        let totals = category_totals(transactions);
        debug!(categories = totals.len(), "Requesting spending summary");

        match ai.summarize_spending(&totals).await {
            Ok(payload) => from_payload(payload),
            Err(e) => {
                warn!(error = %e, "Spending summary failed, using fallback");
                Insights::new(FAILED_SUMMARY, vec![FAILED_TIP.to_string()])
            }
        }
    }
}

fn placeholder() -> Insights {
    Insights::new(EMPTY_SUMMARY, vec![EMPTY_TIP.to_string()])
}

fn from_payload(payload: SpendingSummary) -> Insights {
    let summary = payload
        .summary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| MISSING_SUMMARY.to_string());

    let mut tips: Vec<String> = payload
        .tips
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tips.is_empty() {
        tips.push(MISSING_TIP.to_string());
    }
    tips.truncate(MAX_TIPS);

    Insights::new(summary, tips)
}
