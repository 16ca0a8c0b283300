//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the two AI
//! operations FinSight needs: labelling a single transaction and summarizing
//! per-category totals.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI operations
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-3-flash-preview)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)
//!
//! When the selected backend's required variables are missing, `from_env`
//! returns `None` and callers run without AI.

mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

#[cfg(test)]
mod http_tests;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Category;
use crate::prompts::{PromptId, PromptLibrary};

/// Trait defining the interface for all AI backends
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Ask the model for a category label for one transaction
    ///
    /// Returns the raw label text; mapping into the closed category set
    /// happens in `parsing::parse_category`.
    async fn categorize_transaction(&self, description: &str, amount: f64) -> Result<String>;

    /// Ask the model for a short summary and tips for the given totals
    async fn summarize_spending(&self, totals: &CategoryTotals) -> Result<SpendingSummary>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini generateContent API
    Gemini(GeminiBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env().map(AIClient::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            "none" | "off" => None,
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to gemini");
                GeminiBackend::from_env().map(AIClient::Gemini)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Backend kind, model and host for display
    pub fn info(&self) -> BackendInfo {
        let kind = match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        };
        BackendInfo {
            kind,
            model: self.model().to_string(),
            host: self.host().to_string(),
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn categorize_transaction(&self, description: &str, amount: f64) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.categorize_transaction(description, amount).await,
            AIClient::OpenAICompatible(b) => b.categorize_transaction(description, amount).await,
            AIClient::Mock(b) => b.categorize_transaction(description, amount).await,
        }
    }

    async fn summarize_spending(&self, totals: &CategoryTotals) -> Result<SpendingSummary> {
        match self {
            AIClient::Gemini(b) => b.summarize_spending(totals).await,
            AIClient::OpenAICompatible(b) => b.summarize_spending(totals).await,
            AIClient::Mock(b) => b.summarize_spending(totals).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Format an amount the way it appears in prompts (`649`, `12.5`)
pub(crate) fn format_prompt_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{:.0}", amount)
    } else {
        amount.to_string()
    }
}

/// Render the classification prompt for one transaction
pub(crate) fn categorize_prompt(
    prompts: &PromptLibrary,
    description: &str,
    amount: f64,
) -> Result<String> {
    let categories = Category::ALL
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let mut vars = HashMap::new();
    vars.insert("description", description.to_string());
    vars.insert("amount", format_prompt_amount(amount));
    vars.insert("categories", categories);
    prompts.render(PromptId::CategorizeTransaction, &vars)
}

/// Render the summary prompt for per-category totals
pub(crate) fn summarize_prompt(prompts: &PromptLibrary, totals: &CategoryTotals) -> Result<String> {
    let mut vars = HashMap::new();
    vars.insert("totals", serde_json::to_string(totals)?);
    prompts.render(PromptId::SummarizeSpending, &vars)
}
