//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API:
//! hosted providers, vLLM, LocalAI, llama-server, Ollama's `/v1` shim.
//!
//! # Configuration
//!
//! Environment variables (see [`crate::config::AiConfig`] for file settings):
//! - `NESTEGG_AI_HOST`: Server URL (required)
//! - `NESTEGG_AI_MODEL`: Model name (default: gpt-4o-mini)
//! - `NESTEGG_AI_API_KEY`: Bearer token, if the server needs one

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::error::{Error, Result};

use super::types::{ChatRequest, ChatResponse};
use super::AIBackend;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Reply length cap; coaching answers are a few short paragraphs
const MAX_TOKENS: u32 = 600;

/// OpenAI-compatible backend
///
/// Sends exactly one request per call. Failures are returned to the caller
/// as-is; there is no retry or backoff.
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OpenAICompatibleBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            temperature: 0.7,
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Create from the `[ai]` config section
    ///
    /// Returns None when no host is configured.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let host = config.host.as_deref()?;
        let mut backend = Self::new(host, &config.model).with_temperature(config.temperature);
        backend.api_key = config.api_key();
        Some(backend)
    }

    fn build_request(&self, request: &ChatRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: Some(self.temperature),
            max_tokens: Some(MAX_TOKENS),
            stream: false,
        }
    }
}

/// Turn a decoded completion into a response, rejecting empty content
fn into_chat_response(body: ChatCompletionResponse, requested_model: &str) -> Result<ChatResponse> {
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::ExternalService("AI response contained no message".into()))?;

    if content.trim().is_empty() {
        return Err(Error::ExternalService("AI response content was empty".into()));
    }

    Ok(ChatResponse {
        content,
        total_tokens: body.usage.map(|u| u.total_tokens),
        model: body.model.unwrap_or_else(|| requested_model.to_string()),
    })
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Null for refusals and tool-only replies
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request(request);
        debug!(
            host = %self.base_url,
            model = %body.model,
            user_chars = request.user.len(),
            "Sending chat completion"
        );

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "AI API error {}: {}",
                status, text
            )));
        }

        let decoded: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("Malformed AI response: {}", e)))?;

        let result = into_chat_response(decoded, &body.model)?;
        info!(
            model = %result.model,
            total_tokens = ?result.total_tokens,
            "Chat completion finished"
        );
        Ok(result)
    }

    async fn health_check(&self) -> bool {
        // /v1/models is standard; some local servers only answer /health
        for path in ["/v1/models", "/health"] {
            if let Ok(resp) = self
                .http_client
                .get(format!("{}{}", self.base_url, path))
                .send()
                .await
            {
                if resp.status().is_success() {
                    return true;
                }
            }
        }
        false
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

    fn request() -> ChatRequest {
        ChatRequest {
            model: None,
            system: "You are a coach.".to_string(),
            user: "How am I doing?".to_string(),
        }
    }

    #[test]
    fn test_backend_new_trims_trailing_slash() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080/", "coach-small");
        assert_eq!(backend.host(), "http://localhost:8080");
        assert_eq!(backend.model(), "coach-small");
    }

    #[test]
    fn test_with_model_keeps_host_and_key() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080", "a").with_api_key("sk-1");
        let other = backend.with_model("b");
        assert_eq!(other.model(), "b");
        assert_eq!(other.host(), "http://localhost:8080");
        assert_eq!(other.api_key.as_deref(), Some("sk-1"));
    }

    #[test]
    fn test_from_config_requires_host() {
        let mut config = AiConfig::default();
        config.host = None;
        assert!(OpenAICompatibleBackend::from_config(&config).is_none());

        config.host = Some("http://ai.local/".to_string());
        config.temperature = 0.2;
        let backend = OpenAICompatibleBackend::from_config(&config).unwrap();
        assert_eq!(backend.host(), "http://ai.local");
        assert_eq!(backend.temperature, 0.2);
    }

    #[test]
    fn test_request_has_system_and_user_messages() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080", "coach-small");
        let json = serde_json::to_value(backend.build_request(&request())).unwrap();

        assert_eq!(json["model"], "coach-small");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are a coach.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "How am I doing?");
        assert_eq!(json["max_tokens"], MAX_TOKENS);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_request_model_override() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8080", "coach-small");
        let req = request().with_model("coach-large");
        assert_eq!(backend.build_request(&req).model, "coach-large");
    }

    #[test]
    fn test_response_with_usage() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "coach-small-0613",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "You're doing fine."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 90, "completion_tokens": 12, "total_tokens": 102}
        }"#;

        let decoded: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let response = into_chat_response(decoded, "coach-small").unwrap();
        assert_eq!(response.content, "You're doing fine.");
        assert_eq!(response.total_tokens, Some(102));
        assert_eq!(response.model, "coach-small-0613");
    }

    #[test]
    fn test_response_without_usage_or_model() {
        let json = r#"{"choices": [{"message": {"content": "Hi"}}]}"#;
        let decoded: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        let response = into_chat_response(decoded, "coach-small").unwrap();
        assert_eq!(response.total_tokens, None);
        assert_eq!(response.model, "coach-small");
    }

    #[test]
    fn test_missing_or_empty_content_is_external_error() {
        for json in [
            r#"{"choices": []}"#,
            r#"{"choices": [{"message": {"content": null}}]}"#,
            r#"{"choices": [{"message": {"content": "   \n "}}]}"#,
        ] {
            let decoded: ChatCompletionResponse = serde_json::from_str(json).unwrap();
            let err = into_chat_response(decoded, "m").unwrap_err();
            assert!(matches!(err, Error::ExternalService(_)), "{}", json);
        }
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAICompatibleBackend::new("http://127.0.0.1:9", "coach-small");
        assert!(!backend.health_check().await);
    }
}
