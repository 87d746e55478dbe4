//! Mock backend for testing
//!
//! Answers coaching prompts with canned replies in the shapes the parsers
//! expect. Useful for unit tests and for running the CLI without an AI server
//! (`AI_BACKEND=mock`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::{ChatRequest, ChatResponse};
use super::AIBackend;

pub const MOCK_INSIGHT_REPLY: &str = "Your spending is mostly on track this month.\n\
Food and shopping make up the largest share.\n\
\n\
- Plan two home-cooked dinners each week\n\
- Set a weekend spending cap\n\
- Review recurring charges before they renew";

pub const MOCK_SAVINGS_REPLY: &str = "RECOMMENDATION: Cook at home on weeknights\n\
SAVINGS: $120\n\
DIFFICULTY: medium\n\
\n\
RECOMMENDATION: Cancel one streaming subscription\n\
SAVINGS: $15\n\
DIFFICULTY: easy";

#[derive(Clone, Debug)]
enum MockReply {
    /// Pick the canned reply matching the prompt's requested format
    Canned,
    Fixed(String),
    Fail(String),
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    pub healthy: bool,
    model: String,
    reply: MockReply,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    /// Healthy backend with canned replies
    pub fn new() -> Self {
        Self {
            healthy: true,
            model: "mock".to_string(),
            reply: MockReply::Canned,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Always answer with `content`
    pub fn with_response(content: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Fixed(content.into()),
            ..Self::new()
        }
    }

    /// Always fail with an external service error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Fail(message.into()),
            ..Self::new()
        }
    }

    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }

        let content = match &self.reply {
            MockReply::Fail(message) => return Err(Error::ExternalService(message.clone())),
            MockReply::Fixed(content) => content.clone(),
            MockReply::Canned if request.system.contains("RECOMMENDATION:") => {
                MOCK_SAVINGS_REPLY.to_string()
            }
            MockReply::Canned => MOCK_INSIGHT_REPLY.to_string(),
        };

        if content.trim().is_empty() {
            return Err(Error::ExternalService("AI response content was empty".into()));
        }

        let total_tokens = ((request.system.len() + request.user.len() + content.len()) / 4) as u32;
        Ok(ChatResponse {
            content,
            total_tokens: Some(total_tokens),
            model: request.model.clone().unwrap_or_else(|| self.model.clone()),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
