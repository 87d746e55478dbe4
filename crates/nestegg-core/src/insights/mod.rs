//! Insight Engine - heuristic financial observations
//!
//! A fixed set of independent rules inspects period aggregates and emits
//! human-readable insights. Every matching rule fires; nothing short-circuits.
//!
//! ## Rules
//!
//! - **Weekend skew** and **front-loaded month** - behavioral patterns
//! - **Category growth** and **improvement** - period-over-period trends
//! - **Budget alerts** and **predictive overspend** - budget health
//! - **Milestones** - savings goal thresholds (per contribution)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nestegg_core::insights::{AnalysisContext, InsightEngine, PeriodAggregates};
//!
//! let aggregates = PeriodAggregates::from_partition(granularity, &partition);
//! let ctx = AnalysisContext::new(&aggregates, &budgets, today);
//! let insights = InsightEngine::new().analyze(&ctx);
//! ```

pub mod budget_alerts;
pub mod engine;
pub mod milestones;
pub mod spending_patterns;
pub mod trends;
pub mod types;

pub use budget_alerts::{BudgetAlertRule, PredictiveOverspendRule};
pub use engine::{AnalysisContext, InsightEngine, PeriodAggregates, Rule, RuleThresholds};
pub use milestones::{
    detect_milestone, milestone_insight, next_milestone, next_milestone_insight, MilestoneEvent,
    NextMilestone, MILESTONES,
};
pub use spending_patterns::{FrontLoadedMonthRule, WeekendSkewRule};
pub use trends::{CategoryGrowthRule, ImprovementRule};
pub use types::{DerivedInsight, InsightKind, Severity, TriggerMetric};
