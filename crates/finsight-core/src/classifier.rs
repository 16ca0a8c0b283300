//! Category classification with a safe fallback
//!
//! Wraps an optional AI backend. Classification never fails: with no backend,
//! on a failed call, or on an unrecognized label the result is
//! `Category::Other`.

use tracing::{debug, warn};

use crate::ai::{parsing::parse_category, AIBackend, AIClient};
use crate::models::Category;

/// Maps transaction text to a category
#[derive(Clone, Default)]
pub struct Classifier {
    ai: Option<AIClient>,
}

impl Classifier {
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    /// Classifier backed by the environment-selected AI client
    pub fn from_env() -> Self {
        Self::new(AIClient::from_env())
    }

    /// Classifier with no backend (everything is `Other`)
    pub fn offline() -> Self {
        Self { ai: None }
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Resolve a category for one transaction
    pub async fn classify(&self, description: &str, amount: f64) -> Category {
        let Some(ref ai) = self.ai else {
            return Category::Other;
        };

        match ai.categorize_transaction(description, amount).await {
            Ok(label) => {
                let category = parse_category(&label);
                debug!(description, %category, "Classified transaction");
                category
            }
            Err(e) => {
                warn!(description, error = %e, "Classification failed, using Other");
                Category::Other
            }
        }
    }
}
