//! Google Gemini backend implementation
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-3-flash-preview)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{Error, Result};
use crate::prompts::PromptLibrary;

use super::parsing::parse_spending_summary;
use super::types::{CategoryTotals, SpendingSummary};
use super::{categorize_prompt, summarize_prompt, AIBackend};

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Gemini backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompts: PromptLibrary,
}

impl GeminiBackend {
    /// Create a backend against the public API
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_host(DEFAULT_GEMINI_HOST, api_key, model)
    }

    /// Create a backend against a custom host (proxies, test servers)
    pub fn with_host(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: PromptLibrary::new(),
        }
    }

    /// Use a specific prompt library
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    /// Create from environment variables
    ///
    /// Required: `GEMINI_API_KEY` (an empty key counts as unset)
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string());

        Some(Self::with_host(&host, &api_key, &model))
    }

    /// Make a generateContent request and return the first candidate's text
    async fn generate(&self, prompt: &str, config: GenerationConfig) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(config),
        };

        let response = self
            .http_client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InvalidData(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response.json().await?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| Error::InvalidData("No candidates in Gemini response".into()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl GenerationConfig {
    /// JSON mode held to the `{summary, tips}` shape
    fn spending_summary() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(json!({
                "type": "OBJECT",
                "properties": {
                    "summary": {
                        "type": "STRING",
                        "description": "A concise summary of the user's spending habits."
                    },
                    "tips": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Actionable financial tips for the user."
                    }
                },
                "required": ["summary", "tips"],
                "propertyOrdering": ["summary", "tips"]
            })),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[async_trait]
impl AIBackend for GeminiBackend {
    async fn categorize_transaction(&self, description: &str, amount: f64) -> Result<String> {
        let prompt = categorize_prompt(&self.prompts, description, amount)?;
        let config = GenerationConfig {
            max_output_tokens: Some(20),
            ..Default::default()
        };
        let response = self.generate(&prompt, config).await?;
        debug!(description, response = %response.trim(), "Gemini category response");
        Ok(response)
    }

    async fn summarize_spending(&self, totals: &CategoryTotals) -> Result<SpendingSummary> {
        let prompt = summarize_prompt(&self.prompts, totals)?;
        let response = self
            .generate(&prompt, GenerationConfig::spending_summary())
            .await?;
        debug!(response = %response, "Gemini summary response");
        parse_spending_summary(&response)
    }

    async fn health_check(&self) -> bool {
        let result = self
            .http_client
            .get(format!("{}/v1beta/models/{}", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await;

        matches!(result, Ok(resp) if resp.status().is_success())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part { text: "hi".into() }],
            }],
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(20),
                ..Default::default()
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 20);
        assert!(json["generationConfig"].get("responseMimeType").is_none());
        assert!(json["generationConfig"].get("responseSchema").is_none());
    }

    #[test]
    fn test_summary_config_requires_summary_and_tips() {
        let json = serde_json::to_value(GenerationConfig::spending_summary()).unwrap();
        assert_eq!(json["responseMimeType"], "application/json");

        let schema = &json["responseSchema"];
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["summary", "tips"]));
        assert_eq!(schema["properties"]["tips"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["tips"]["items"]["type"], "STRING");
    }

    #[test]
    fn test_response_without_candidates_parses() {
        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());

        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Food"}]}}]}"#,
        )
        .unwrap();
        let text = &body.candidates[0].content.as_ref().unwrap().parts[0].text;
        assert_eq!(text, "Food");
    }

    #[test]
    fn test_with_host_trims_trailing_slash() {
        let backend = GeminiBackend::with_host("http://localhost:9999/", "key", "m");
        assert_eq!(backend.host(), "http://localhost:9999");
        assert_eq!(backend.model(), "m");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = GeminiBackend::with_host("http://127.0.0.1:1", "key", "m");
        assert!(!backend.health_check().await);
    }
}
