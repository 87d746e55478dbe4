//! Budget alerts
//!
//! Threshold alerts are part of core budget tracking. The month-end
//! projection is a predictive alert and is gated to premium accounts.

use chrono::Datelike;

use crate::entitlement::Feature;
use crate::metrics::{budget_metrics, BudgetStatus};
use crate::periods::days_in_month;

use super::engine::{AnalysisContext, Rule};
use super::types::{DerivedInsight, InsightKind, Severity};

/// Warns about budgets at their alert threshold or over their limit
pub struct BudgetAlertRule;

impl Rule for BudgetAlertRule {
    fn kind(&self) -> InsightKind {
        InsightKind::BudgetAlert
    }

    fn name(&self) -> &'static str {
        "Budget Alert"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        ctx.budgets
            .iter()
            .filter_map(|budget| {
                let m = budget_metrics(budget);
                match m.status {
                    BudgetStatus::Ok => None,
                    BudgetStatus::Warning => Some(
                        DerivedInsight::new(
                            InsightKind::BudgetAlert,
                            Severity::Attention,
                            Feature::Budgets,
                            format!(
                                "You've used {:.0}% of your {} budget.",
                                m.utilization, m.category
                            ),
                        )
                        .with_metric("utilization_percent", m.utilization),
                    ),
                    BudgetStatus::Exceeded => Some(
                        DerivedInsight::new(
                            InsightKind::BudgetAlert,
                            Severity::Warning,
                            Feature::Budgets,
                            format!(
                                "You've exceeded your {} budget by ${:.2}.",
                                m.category, -m.remaining
                            ),
                        )
                        .with_metric("utilization_percent", m.utilization),
                    ),
                }
            })
            .collect()
    }
}

/// Projects month-end spend from the pace so far
pub struct PredictiveOverspendRule;

/// spent / elapsed days × days in month
pub fn projected_month_spend(spent: f64, day_of_month: u32, days_in_month: u32) -> f64 {
    if day_of_month == 0 {
        return spent;
    }
    spent / day_of_month as f64 * days_in_month as f64
}

impl Rule for PredictiveOverspendRule {
    fn kind(&self) -> InsightKind {
        InsightKind::PredictiveOverspend
    }

    fn name(&self) -> &'static str {
        "Predictive Overspend"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        let day = ctx.today.day();
        let month_days = days_in_month(ctx.today);

        ctx.budgets
            .iter()
            .filter(|b| b.monthly_limit > 0.0 && b.spent > 0.0 && b.spent < b.monthly_limit)
            .filter_map(|budget| {
                let projected = projected_month_spend(budget.spent, day, month_days);
                if projected <= budget.monthly_limit {
                    return None;
                }

                Some(
                    DerivedInsight::new(
                        InsightKind::PredictiveOverspend,
                        Severity::Warning,
                        Feature::PredictiveAlerts,
                        format!(
                            "At your current pace you'll spend ${:.0} on {} this month, ${:.0} over budget.",
                            projected,
                            budget.category,
                            projected - budget.monthly_limit
                        ),
                    )
                    .with_metric("projected_spend", projected),
                )
            })
            .collect()
    }
}
