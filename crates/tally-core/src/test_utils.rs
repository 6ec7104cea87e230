//! Test utilities for tally-core
//!
//! This module provides testing infrastructure including a mock LLM server
//! that can be used for development and integration tests. It speaks both the
//! Ollama generate API and the OpenAI chat completions API so either backend
//! can point at it.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// What the mock server answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLlmMode {
    /// Valid classification JSON derived from prompt keywords
    Classify,
    /// Prose with no JSON in it (exercises the no-JSON fallback path)
    Garbage,
    /// Syntactically valid JSON with an out-of-vocabulary category
    /// (exercises the schema-validation fallback path)
    InvalidEnum,
}

/// Mock LLM server for testing and development
pub struct MockLlmServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start a well-behaved mock server on an available port
    pub async fn start() -> Self {
        Self::start_with_mode(MockLlmMode::Classify).await
    }

    /// Start a mock server with a specific response mode
    pub async fn start_with_mode(mode: MockLlmMode) -> Self {
        let state = Arc::new(mode);
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state);

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
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
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

/// Build the response body for a given prompt and mode
fn respond(prompt: &str, mode: MockLlmMode) -> String {
    match mode {
        MockLlmMode::Classify => classify_prompt(prompt),
        MockLlmMode::Garbage => "I'm sorry, I can't help with that request.".to_string(),
        MockLlmMode::InvalidEnum => {
            r#"{"type": "EXPENSE", "category": "MOON_REAL_ESTATE", "scenario": "REGULAR",
                "merchant": "m", "description": "d", "analysis": "a"}"#
                .to_string()
        }
    }
}

/// Keyword classification mirroring what a small local model tends to do
fn classify_prompt(prompt: &str) -> String {
    let upper = prompt.to_uppercase();

    let (tx_type, category, merchant) = if upper.contains("SALARY") || upper.contains("PAYCHECK") {
        ("INCOME", "OTHER", "employer")
    } else if upper.contains("LATTE") || upper.contains("COFFEE") || upper.contains("STARBUCKS") {
        ("EXPENSE", "COFFEE_TEA", "Starbucks")
    } else if upper.contains("TRAIN") || upper.contains("METRO") {
        ("EXPENSE", "PUBLIC_TRANSPORT", "transit authority")
    } else if upper.contains("LUNCH") || upper.contains("DINNER") {
        ("EXPENSE", "FOOD_DINING", "restaurant")
    } else {
        ("EXPENSE", "OTHER", "unknown merchant")
    };

    format!(
        r#"Here is the analysis you asked for:
{{"type": "{}", "category": "{}", "scenario": "REGULAR", "merchant": "{}", "description": "mock transaction", "analysis": "keyword classification by mock server"}}"#,
        tx_type, category, merchant
    )
}

// ---------------------------------------------------------------------------
// Ollama API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[allow(dead_code)]
    #[serde(default)]
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
async fn handle_generate(
    State(mode): State<Arc<MockLlmMode>>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerateResponse> {
    Json(GenerateResponse {
        response: respond(&request.prompt, *mode),
        model: request.model,
        done: true,
    })
}

// ---------------------------------------------------------------------------
// OpenAI chat completions API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatRequestMessage {
    #[allow(dead_code)]
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Serialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ChatResponseMessage {
    role: String,
    content: String,
}

/// OpenAI models endpoint (health check)
async fn handle_models() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "gpt-3.5-turbo", "object": "model"}]
    }))
}

/// OpenAI chat completions endpoint
async fn handle_chat(
    State(mode): State<Arc<MockLlmMode>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let prompt = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or("");

    Json(ChatResponse {
        choices: vec![ChatChoice {
            message: ChatResponseMessage {
                role: "assistant".to_string(),
                content: respond(prompt, *mode),
            },
            finish_reason: "stop".to_string(),
        }],
        model: request.model,
    })
}
