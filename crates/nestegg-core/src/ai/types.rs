//! AI request and response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

use crate::models::{SavingsGoal, Transaction};

/// A single chat completion call: one system and one user message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model override; backends use their configured model when `None`
    pub model: Option<String>,
    pub system: String,
    pub user: String,
}

impl ChatRequest {
    pub fn new(prompt: ChatPrompt) -> Self {
        Self {
            model: None,
            system: prompt.system,
            user: prompt.user,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Non-empty assistant content plus usage accounting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    /// `usage.total_tokens` when the server reports it
    pub total_tokens: Option<u32>,
    /// Model that answered, as reported by the server
    pub model: String,
}

/// Rendered prompt pair produced by the prompt builder
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Summary data serialized into a coaching prompt
#[derive(Debug, Clone, Copy)]
pub struct InsightPromptInput<'a> {
    pub transactions: &'a [Transaction],
    /// Sum of monthly budget limits
    pub budget_total: f64,
    /// Sum of spending against those budgets
    pub spent_total: f64,
    pub monthly_income: f64,
    pub goals: &'a [SavingsGoal],
    /// Free-text topic the user asked about
    pub focus: Option<&'a str>,
}

/// Tone of a generated insight, derived from budget utilization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Warning,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed coaching reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedInsight {
    pub insight: String,
    pub suggestions: Vec<String>,
    pub sentiment: Sentiment,
}

/// Effort level of a savings recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// One structured savings action
///
/// The degraded form (unstructured reply) carries the raw text as `action`
/// with no savings or difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsRecommendation {
    pub action: String,
    pub estimated_savings: Option<f64>,
    pub difficulty: Option<Difficulty>,
}

impl SavingsRecommendation {
    pub fn is_structured(&self) -> bool {
        self.estimated_savings.is_some() && self.difficulty.is_some()
    }
}
