//! HTTP backends against the mock LLM server

use super::*;
use crate::classifier::Classifier;
use crate::insights::{Summarizer, FAILED_SUMMARY};
use crate::test_utils::{MockLlmServer, MockMode};

fn totals() -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    totals.insert(Category::Rent, 15000.0);
    totals.insert(Category::Food, 4200.0);
    totals
}

fn gemini(server: &MockLlmServer) -> GeminiBackend {
    GeminiBackend::with_host(&server.url(), "test-key", "gemini-test")
        .with_prompts(PromptLibrary::embedded_only())
}

fn openai(server: &MockLlmServer) -> OpenAICompatibleBackend {
    OpenAICompatibleBackend::new(&server.url(), "mock-model")
        .with_prompts(PromptLibrary::embedded_only())
}

#[tokio::test]
async fn test_gemini_roundtrip() {
    let server = MockLlmServer::start().await;
    let backend = gemini(&server);

    assert!(backend.health_check().await);

    let label = backend.categorize_transaction("Netflix", 649.0).await.unwrap();
    assert_eq!(parsing::parse_category(&label), Category::Subscriptions);

    let summary = backend.summarize_spending(&totals()).await.unwrap();
    assert!(summary.summary.unwrap().contains("Rent"));
    assert_eq!(summary.tips.unwrap().len(), 3);
    assert_eq!(server.requests(), 2);
}

#[tokio::test]
async fn test_openai_compatible_roundtrip() {
    let server = MockLlmServer::start().await;
    let backend = openai(&server);

    assert!(backend.health_check().await);

    let label = backend.categorize_transaction("Uber ride", 250.0).await.unwrap();
    assert_eq!(parsing::parse_category(&label), Category::Travel);

    let summary = backend.summarize_spending(&totals()).await.unwrap();
    assert!(summary.summary.is_some());
}

#[tokio::test]
async fn test_server_errors_surface_as_errors() {
    let server = MockLlmServer::start().await;
    server.set_mode(MockMode::Failing);

    assert!(gemini(&server)
        .categorize_transaction("Netflix", 649.0)
        .await
        .is_err());
    assert!(openai(&server).summarize_spending(&totals()).await.is_err());
}

#[tokio::test]
async fn test_fallbacks_over_http() {
    let server = MockLlmServer::start().await;
    let client = AIClient::Gemini(gemini(&server));
    let classifier = Classifier::new(Some(client.clone()));
    let summarizer = Summarizer::new(Some(client));

    let tx = crate::models::NewTransaction::new(
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        "Netflix",
        649.0,
    )
    .into_transaction(Category::Subscriptions);

    server.set_mode(MockMode::Garbage);
    assert_eq!(classifier.classify("Netflix", 649.0).await, Category::Other);
    let insights = summarizer.summarize(std::slice::from_ref(&tx)).await;
    assert_eq!(insights.summary, FAILED_SUMMARY);

    server.set_mode(MockMode::Failing);
    assert_eq!(classifier.classify("Netflix", 649.0).await, Category::Other);
    assert_eq!(
        summarizer.summarize(std::slice::from_ref(&tx)).await.summary,
        FAILED_SUMMARY
    );

    server.set_mode(MockMode::Normal);
    assert_eq!(
        classifier.classify("Netflix", 649.0).await,
        Category::Subscriptions
    );
}
