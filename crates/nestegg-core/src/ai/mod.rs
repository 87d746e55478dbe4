//! AI coaching: prompt building, chat-completion backends and reply parsing
//!
//! # Architecture
//!
//! - `prompt_builder`: validates summary data and renders a system/user prompt pair
//! - `AIBackend` trait: one request in, one response out
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - `parsing`: recovers insights and recommendations from free-form replies
//! - `Coach`: runs builder → backend → parser for a single user action
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let client = AIClient::from_config(&config.ai).ok_or("AI not configured")?;
//! let mut coach = Coach::new(client);
//! let insight = coach.generate_insight(&input).await?;
//! println!("{}", insight.insight);
//! ```
//!
//! # Configuration
//!
//! The `[ai]` config section picks host, model and the API key variable
//! (`NESTEGG_AI_API_KEY` by default). `NESTEGG_AI_HOST` and `NESTEGG_AI_MODEL`
//! override the file, and `AI_BACKEND=mock` selects the canned backend.

pub mod coach;
mod mock;
mod openai_compatible;
pub mod parsing;
pub mod prompt_builder;
pub mod types;

pub use coach::Coach;
pub use mock::{MockBackend, MOCK_INSIGHT_REPLY, MOCK_SAVINGS_REPLY};
pub use openai_compatible::{OpenAICompatibleBackend, DEFAULT_MODEL};
pub use parsing::{classify_sentiment, parse_insight_response, parse_savings_recommendations};
pub use prompt_builder::{build_insight_prompt, build_savings_prompt, validate_input};
pub use types::*;

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::error::Result;

/// Interface for chat-completion backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send one system + user exchange and return the assistant's reply
    ///
    /// Missing or blank content is an `ExternalService` error.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    fn model(&self) -> &str;

    /// Host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// Any OpenAI chat-completions server
    OpenAICompatible(OpenAICompatibleBackend),
    /// Canned replies for tests and offline use
    Mock(MockBackend),
}

fn mock_requested() -> bool {
    std::env::var("AI_BACKEND").is_ok_and(|b| b.eq_ignore_ascii_case("mock"))
}

impl AIClient {
    /// Create an AI client from the `[ai]` config section
    ///
    /// `AI_BACKEND=mock` still wins so the CLI can run offline.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        if mock_requested() {
            return Some(AIClient::mock());
        }
        OpenAICompatibleBackend::from_config(config).map(AIClient::OpenAICompatible)
    }

    pub fn openai_compatible(host: &str, model: &str) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::new(host, model))
    }

    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
