//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entitlement::Feature;

/// Which rule produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Weekend spending well above weekday pace
    WeekendSkew,
    /// A category grew against the previous period
    CategoryGrowth,
    /// Most of the month's spending happened in its first week
    FrontLoadedMonth,
    /// Overall spending went down
    Improvement,
    /// A savings goal crossed a progress threshold
    Milestone,
    /// Distance to the next savings threshold
    NextMilestone,
    /// A budget is at its warning threshold or over its limit
    BudgetAlert,
    /// A budget is on pace to be exceeded by month end
    PredictiveOverspend,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeekendSkew => "weekend_skew",
            Self::CategoryGrowth => "category_growth",
            Self::FrontLoadedMonth => "front_loaded_month",
            Self::Improvement => "improvement",
            Self::Milestone => "milestone",
            Self::NextMilestone => "next_milestone",
            Self::BudgetAlert => "budget_alert",
            Self::PredictiveOverspend => "predictive_overspend",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth attention but not urgent
    Attention,
    /// Should be addressed soon
    Warning,
    /// Good news
    Positive,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
            Severity::Positive => "positive",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "attention" => Ok(Severity::Attention),
            "warning" => Ok(Severity::Warning),
            "positive" => Ok(Severity::Positive),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// The number that made a rule fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerMetric {
    pub name: String,
    pub value: f64,
}

/// An observation produced by a rule (never persisted by the core)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedInsight {
    pub kind: InsightKind,
    pub severity: Severity,
    /// Feature the insight belongs to, for entitlement gating
    pub feature: Feature,
    pub message: String,
    pub metric: Option<TriggerMetric>,
}

impl DerivedInsight {
    pub fn new(
        kind: InsightKind,
        severity: Severity,
        feature: Feature,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            feature,
            message: message.into(),
            metric: None,
        }
    }

    /// Attach the triggering metric
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metric = Some(TriggerMetric {
            name: name.into(),
            value,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_as_str() {
        assert_eq!(InsightKind::FrontLoadedMonth.as_str(), "front_loaded_month");
        assert_eq!(InsightKind::Milestone.to_string(), "milestone");
    }

    #[test]
    fn test_severity_round_trip_str() {
        for s in [Severity::Info, Severity::Attention, Severity::Warning, Severity::Positive] {
            assert_eq!(Severity::from_str(s.as_str()).unwrap(), s);
        }
    }

    #[test]
    fn test_insight_builder() {
        let insight = DerivedInsight::new(
            InsightKind::CategoryGrowth,
            Severity::Attention,
            Feature::SpendingPatterns,
            "Food spending is up 20%",
        )
        .with_metric("growth_percent", 20.0);

        assert_eq!(insight.metric.as_ref().unwrap().name, "growth_percent");
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"], "category_growth");
        assert_eq!(json["feature"], "spending_patterns");
    }
}
