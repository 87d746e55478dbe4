//! Entitlement gate
//!
//! Decides which features an account tier may see. Core manual tracking is
//! always visible; AI and predictive features need a premium account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::insights::DerivedInsight;
use crate::models::AccountTier;

/// A gated dashboard feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Transactions,
    Budgets,
    SavingsGoals,
    Subscriptions,
    BasicAnalytics,
    AiInsights,
    SavingsRecommendations,
    SpendingPatterns,
    PredictiveAlerts,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::SavingsGoals => "savings_goals",
            Self::Subscriptions => "subscriptions",
            Self::BasicAnalytics => "basic_analytics",
            Self::AiInsights => "ai_insights",
            Self::SavingsRecommendations => "savings_recommendations",
            Self::SpendingPatterns => "spending_patterns",
            Self::PredictiveAlerts => "predictive_alerts",
        }
    }

    pub fn all() -> &'static [Feature] {
        &[
            Self::Transactions,
            Self::Budgets,
            Self::SavingsGoals,
            Self::Subscriptions,
            Self::BasicAnalytics,
            Self::AiInsights,
            Self::SavingsRecommendations,
            Self::SpendingPatterns,
            Self::PredictiveAlerts,
        ]
    }

    pub fn is_premium(&self) -> bool {
        matches!(
            self,
            Self::AiInsights
                | Self::SavingsRecommendations
                | Self::SpendingPatterns
                | Self::PredictiveAlerts
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    /// Accepts snake_case ids and display names ("AI insight", "Predictive alerts")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        let normalized = normalized.trim_end_matches('s');
        match normalized {
            "transaction" => Ok(Self::Transactions),
            "budget" => Ok(Self::Budgets),
            "savings_goal" | "goal" => Ok(Self::SavingsGoals),
            "subscription" => Ok(Self::Subscriptions),
            "basic_analytic" | "analytic" => Ok(Self::BasicAnalytics),
            "ai_insight" => Ok(Self::AiInsights),
            "savings_recommendation" | "recommendation" => Ok(Self::SavingsRecommendations),
            "spending_pattern" | "pattern" => Ok(Self::SpendingPatterns),
            "predictive_alert" => Ok(Self::PredictiveAlerts),
            _ => Err(format!("Unknown feature: {}", s)),
        }
    }
}

/// Whether `tier` may see `feature`
pub fn is_visible(tier: AccountTier, feature: Feature) -> bool {
    match tier {
        AccountTier::Premium => true,
        AccountTier::Free => !feature.is_premium(),
    }
}

/// Drop insights the tier may not see, keeping order
pub fn gate_insights(tier: AccountTier, insights: Vec<DerivedInsight>) -> Vec<DerivedInsight> {
    let before = insights.len();
    let visible: Vec<DerivedInsight> = insights
        .into_iter()
        .filter(|i| is_visible(tier, i.feature))
        .collect();

    if visible.len() < before {
        tracing::debug!(
            tier = tier.as_str(),
            hidden = before - visible.len(),
            "Insights hidden by entitlement gate"
        );
    }
    visible
}
