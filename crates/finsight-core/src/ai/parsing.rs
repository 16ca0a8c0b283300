//! Parsing helpers for AI backend responses
//!
//! Models often wrap their answer in extra text or Markdown fences; these
//! functions dig out the payload.

use crate::error::{Error, Result};
use crate::models::Category;

use super::types::SpendingSummary;

/// Extract a JSON object from a model response
///
/// Handles ```json fenced blocks, then falls back to first `{` .. last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let mut inner = trimmed;
        if let Some((_, after_first)) = inner.split_once('\n') {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim());
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&trimmed[start..=end])
}

/// Parse a category from a classification response
///
/// The trimmed response must be exactly one category name (any case).
/// Anything else becomes `Category::Other`.
pub fn parse_category(response: &str) -> Category {
    response.trim().parse().unwrap_or_default()
}

/// Parse a `{summary, tips}` payload from a summary response
pub fn parse_spending_summary(response: &str) -> Result<SpendingSummary> {
    let json_str = extract_json(response).ok_or_else(|| {
        Error::InvalidData(format!(
            "No JSON found in AI summary response | Raw: {}",
            truncate_raw(response)
        ))
    })?;

    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid summary JSON from AI: {} | Raw: {}",
            e,
            truncate_raw(json_str)
        ))
    })
}

/// Truncate long responses for error messages
fn truncate_raw(raw: &str) -> String {
    if raw.chars().count() > 200 {
        format!("{}...", raw.chars().take(200).collect::<String>())
    } else {
        raw.to_string()
    }
}
