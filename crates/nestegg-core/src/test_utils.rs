//! Test utilities for nestegg-core
//!
//! This module provides testing infrastructure including a mock chat
//! completions server that speaks the OpenAI wire format, for development
//! and integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::oneshot;

use crate::ai::{MOCK_INSIGHT_REPLY, MOCK_SAVINGS_REPLY};

/// How the server answers chat completions
#[derive(Debug, Clone)]
enum Reply {
    /// Pick the insight or savings reply from the system prompt
    Canned,
    Fixed(String),
    Status(u16),
}

/// A chat completion the server received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockChatServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Start the mock server on an available port with canned replies
    pub async fn start() -> Self {
        Self::spawn(Reply::Canned).await
    }

    /// Start a server that always replies with `content`
    pub async fn with_reply(content: &str) -> Self {
        Self::spawn(Reply::Fixed(content.to_string())).await
    }

    /// Start a server that fails every completion with `status`
    pub async fn failing(status: u16) -> Self {
        Self::spawn(Reply::Status(status)).await
    }

    async fn spawn(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            reply,
            requests: requests.clone(),
        };

        let app = Router::new()
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
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Completions received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Model listing (health check)
async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{ "id": "mock-coach", "object": "model" }]
    }))
}

async fn handle_chat(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<CompletionRequest>,
) -> Response {
    let system = message_content(&request, "system");
    let user = message_content(&request, "user");

    state.requests.lock().unwrap().push(RecordedRequest {
        model: request.model.clone(),
        system: system.clone(),
        user,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let content = match state.reply {
        Reply::Canned if system.contains("RECOMMENDATION:") => MOCK_SAVINGS_REPLY.to_string(),
        Reply::Canned => MOCK_INSIGHT_REPLY.to_string(),
        Reply::Fixed(content) => content,
        Reply::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, "mock failure").into_response();
        }
    };

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": request.model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    }))
    .into_response()
}

fn message_content(request: &CompletionRequest, role: &str) -> String {
    request
        .messages
        .iter()
        .find(|m| m.role == role)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<CompletionMessage>,
}

#[derive(Debug, Deserialize, Serialize)]
struct CompletionMessage {
    role: String,
    content: String,
}
