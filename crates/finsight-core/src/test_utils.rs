//! Test utilities for finsight-core
//!
//! A mock LLM server speaking both the OpenAI-compatible chat completions
//! protocol and the Gemini `generateContent` protocol, so the real HTTP
//! backends can be exercised end to end.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::MockBackend;

/// How the mock server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MockMode {
    /// Well-formed answers
    Normal = 0,
    /// HTTP 500 for every model call
    Failing = 1,
    /// 200 responses whose content is unusable
    Garbage = 2,
}

impl MockMode {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Failing,
            2 => Self::Garbage,
            _ => Self::Normal,
        }
    }
}

#[derive(Clone, Default)]
struct ServerState {
    mode: Arc<AtomicU8>,
    requests: Arc<AtomicUsize>,
}

impl ServerState {
    fn mode(&self) -> MockMode {
        MockMode::from_u8(self.mode.load(Ordering::SeqCst))
    }
}

/// Mock LLM server for tests
pub struct MockLlmServer {
    addr: SocketAddr,
    state: ServerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = ServerState::default();

        let app = Router::new()
            .route("/v1/models", get(handle_openai_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route(
                "/v1beta/models/:model",
                get(handle_gemini_model).post(handle_generate_content),
            )
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_mode(&self, mode: MockMode) {
        self.state.mode.store(mode as u8, Ordering::SeqCst);
    }

    /// Number of model calls (classification or summary) received
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Answer text for a prompt, or None when the server should fail
fn answer_for(state: &ServerState, prompt: &str) -> Option<String> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    match state.mode() {
        MockMode::Failing => None,
        MockMode::Garbage => Some("I'm not sure what you mean".to_string()),
        MockMode::Normal => Some(if prompt.contains("Categorize this transaction:") {
            MockBackend::label_for(&description_from_prompt(prompt)).to_string()
        } else if prompt.contains("Analyze spending") {
            json!({
                "summary": "Rent is your largest expense. Food comes second.",
                "tips": [
                    "Cook at home more often.",
                    "Review recurring payments.",
                    "Set a monthly budget."
                ]
            })
            .to_string()
        } else {
            "Other".to_string()
        }),
    }
}

/// Pull the quoted description out of a classification prompt
fn description_from_prompt(prompt: &str) -> String {
    prompt
        .split_once('"')
        .and_then(|(_, rest)| rest.split_once("\" (Amount"))
        .map(|(description, _)| description.to_string())
        .unwrap_or_default()
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "mock failure").into_response()
}

// ========== OpenAI-compatible ==========

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

async fn handle_openai_models() -> Json<Value> {
    Json(json!({ "object": "list", "data": [{ "id": "mock-model", "object": "model" }] }))
}

async fn handle_chat_completions(
    State(state): State<ServerState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let prompt = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or("");

    match answer_for(&state, prompt) {
        Some(content) => Json(json!({
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => server_error(),
    }
}

// ========== Gemini ==========

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

async fn handle_gemini_model(axum::extract::Path(model): axum::extract::Path<String>) -> Json<Value> {
    Json(json!({ "name": format!("models/{}", model) }))
}

async fn handle_generate_content(
    State(state): State<ServerState>,
    axum::extract::Path(model_action): axum::extract::Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    if !model_action.ends_with(":generateContent") {
        return (StatusCode::NOT_FOUND, "unknown action").into_response();
    }

    let prompt = request
        .contents
        .iter()
        .flat_map(|c| c.parts.iter())
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    match answer_for(&state, &prompt) {
        Some(text) => Json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        None => server_error(),
    }
}
