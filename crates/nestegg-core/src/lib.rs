//! Nestegg Core Library
//!
//! Derived metrics and insights for the Nestegg personal finance app:
//! - Period windows and spending aggregates
//! - Budget, savings goal and subscription metrics
//! - Heuristic insight rules with tier-based entitlement gating
//! - AI coaching over any OpenAI-compatible chat completions server
//! - Prompt library for customizable AI prompts
//! - Read-only record access through an injected store

pub mod ai;
pub mod analytics;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod periods;
pub mod prompts;
pub mod store;

/// Test utilities including a mock chat completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, Coach, GeneratedInsight, InsightPromptInput, MockBackend,
    OpenAICompatibleBackend, SavingsRecommendation, Sentiment,
};
pub use analytics::{
    build_report, coaching_data, preview_contribution, CoachingData, ContributionOutcome,
    DashboardReport, ReportOptions,
};
pub use config::{AiConfig, Config};
pub use entitlement::{gate_insights, is_visible, Feature};
pub use error::{Error, Result};
pub use insights::{DerivedInsight, InsightEngine, InsightKind, Severity};
pub use models::{
    AccountTier, BillingCycle, Budget, Category, Priority, SavingsGoal, Subscription, Transaction,
};
pub use periods::{DateWindow, Granularity, WeekStart};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use store::{FinanceStore, LedgerSnapshot, MemoryStore};
