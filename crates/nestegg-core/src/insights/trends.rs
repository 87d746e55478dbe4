//! Period-over-period trend rules
//!
//! Compares the current window against the previous one of the same
//! granularity, per category and overall.

use crate::entitlement::Feature;
use crate::metrics::period_change;

use super::engine::{AnalysisContext, Rule};
use super::types::{DerivedInsight, InsightKind, Severity};

/// Alerts on categories that grew faster than the threshold
pub struct CategoryGrowthRule {
    /// Minimum growth percent to report (default 15%)
    min_growth_percent: f64,
}

impl CategoryGrowthRule {
    pub fn new(min_growth_percent: f64) -> Self {
        Self { min_growth_percent }
    }
}

impl Default for CategoryGrowthRule {
    fn default() -> Self {
        Self::new(15.0)
    }
}

impl Rule for CategoryGrowthRule {
    fn kind(&self) -> InsightKind {
        InsightKind::CategoryGrowth
    }

    fn name(&self) -> &'static str {
        "Category Growth"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        let agg = ctx.aggregates;
        let mut growing = Vec::new();

        for current in &agg.current_categories {
            // Only categories present in both periods
            let Some(previous) = agg
                .previous_categories
                .iter()
                .find(|p| p.category == current.category && p.amount > 0.0)
            else {
                continue;
            };

            let growth = (current.amount - previous.amount) / previous.amount * 100.0;
            if growth > self.min_growth_percent {
                growing.push((current.category, growth));
            }
        }

        // Largest growth first
        growing.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        growing
            .into_iter()
            .map(|(category, growth)| {
                let severity = if growth > 50.0 {
                    Severity::Warning
                } else {
                    Severity::Attention
                };
                DerivedInsight::new(
                    InsightKind::CategoryGrowth,
                    severity,
                    Feature::SpendingPatterns,
                    format!(
                        "{} spending is up {:.0}% compared to last {}.",
                        category.label(),
                        growth.round(),
                        agg.granularity.noun()
                    ),
                )
                .with_metric(format!("{}_growth_percent", category.as_str()), growth)
            })
            .collect()
    }
}

/// Congratulates a drop in overall spending
pub struct ImprovementRule {
    /// Change percent below which spending counts as improved (default -5%)
    threshold_percent: f64,
}

impl ImprovementRule {
    pub fn new(threshold_percent: f64) -> Self {
        Self { threshold_percent }
    }
}

impl Default for ImprovementRule {
    fn default() -> Self {
        Self::new(-5.0)
    }
}

impl Rule for ImprovementRule {
    fn kind(&self) -> InsightKind {
        InsightKind::Improvement
    }

    fn name(&self) -> &'static str {
        "Improvement"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        let agg = ctx.aggregates;
        let change = period_change(agg.current_total, agg.previous_total);
        if change >= self.threshold_percent {
            return vec![];
        }

        vec![DerivedInsight::new(
            InsightKind::Improvement,
            Severity::Positive,
            Feature::BasicAnalytics,
            format!(
                "Great job! You spent {:.0}% less than last {}.",
                change.abs().round(),
                agg.granularity.noun()
            ),
        )
        .with_metric("period_change_percent", change)]
    }
}
