//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Per-category spending totals sent to the summarizer
pub type CategoryTotals = BTreeMap<Category, f64>;

/// Raw summary payload as returned by a model
///
/// Both fields are optional: a model that omits one still produces a usable
/// summary once defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tips: Option<Vec<String>>,
}

/// Connection details for display
#[derive(Debug, Clone)]
pub struct BackendInfo {
    /// Backend kind (gemini, openai_compatible, mock)
    pub kind: &'static str,
    pub model: String,
    pub host: String,
}
