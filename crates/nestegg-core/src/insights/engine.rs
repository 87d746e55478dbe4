//! Insight Engine - runs every registered rule over period aggregates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{category_breakdown, period_change, total_spent, CategoryTotal};
use crate::models::Budget;
use crate::periods::{first_week_total, weekday_split, Granularity, PeriodPartition, WeekdaySplit};

use super::budget_alerts::{BudgetAlertRule, PredictiveOverspendRule};
use super::spending_patterns::{FrontLoadedMonthRule, WeekendSkewRule};
use super::trends::{CategoryGrowthRule, ImprovementRule};
use super::types::{DerivedInsight, InsightKind};

/// Totals for the current and previous window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodAggregates {
    pub granularity: Granularity,
    pub current_total: f64,
    pub previous_total: f64,
    pub current_categories: Vec<CategoryTotal>,
    pub previous_categories: Vec<CategoryTotal>,
    /// Weekday/weekend split of the current window
    pub weekday: WeekdaySplit,
    /// Spending on days 1–7 of the current window
    pub first_week_total: f64,
}

impl PeriodAggregates {
    pub fn from_partition(granularity: Granularity, partition: &PeriodPartition<'_>) -> Self {
        Self {
            granularity,
            current_total: total_spent(&partition.current),
            previous_total: total_spent(&partition.previous),
            current_categories: category_breakdown(&partition.current),
            previous_categories: category_breakdown(&partition.previous),
            weekday: weekday_split(&partition.current),
            first_week_total: first_week_total(&partition.current),
        }
    }

    pub fn change_percent(&self) -> f64 {
        period_change(self.current_total, self.previous_total)
    }
}

/// Tunable rule thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Weekend total must exceed weekday total times this
    pub weekend_ratio: f64,
    /// Minimum category growth percent to report
    pub category_growth_percent: f64,
    /// Share of the month spent in days 1–7 that counts as front-loaded
    pub front_loaded_percent: f64,
    /// Overall change percent below which spending counts as improved
    pub improvement_percent: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            weekend_ratio: 0.4,
            category_growth_percent: 15.0,
            front_loaded_percent: 35.0,
            improvement_percent: -5.0,
        }
    }
}

/// Everything a rule may look at
pub struct AnalysisContext<'a> {
    pub aggregates: &'a PeriodAggregates,
    pub budgets: &'a [Budget],
    pub today: NaiveDate,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(aggregates: &'a PeriodAggregates, budgets: &'a [Budget], today: NaiveDate) -> Self {
        Self {
            aggregates,
            budgets,
            today,
        }
    }
}

/// A heuristic that inspects aggregates and emits zero or more insights
pub trait Rule: Send + Sync {
    fn kind(&self) -> InsightKind;

    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight>;
}

/// The main insight engine that orchestrates rule evaluation
pub struct InsightEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rules and default thresholds
    pub fn new() -> Self {
        Self::with_thresholds(RuleThresholds::default())
    }

    pub fn with_thresholds(thresholds: RuleThresholds) -> Self {
        let mut engine = Self { rules: vec![] };

        engine.register(Box::new(WeekendSkewRule::new(thresholds.weekend_ratio)));
        engine.register(Box::new(CategoryGrowthRule::new(
            thresholds.category_growth_percent,
        )));
        engine.register(Box::new(FrontLoadedMonthRule::new(
            thresholds.front_loaded_percent,
        )));
        engine.register(Box::new(ImprovementRule::new(thresholds.improvement_percent)));
        engine.register(Box::new(BudgetAlertRule));
        engine.register(Box::new(PredictiveOverspendRule));

        engine
    }

    /// Create an engine with no rules registered
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Evaluate every rule; output keeps registration order
    pub fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        let mut all = Vec::new();

        for rule in &self.rules {
            let found = rule.evaluate(ctx);
            if !found.is_empty() {
                tracing::debug!(rule = rule.name(), count = found.len(), "Rule fired");
            }
            all.extend(found);
        }

        all
    }

    pub fn rule_kinds(&self) -> Vec<InsightKind> {
        self.rules.iter().map(|r| r.kind()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlement::Feature;
    use crate::insights::Severity;
    use crate::models::Category;

    fn aggregates(current: f64, previous: f64) -> PeriodAggregates {
        PeriodAggregates {
            granularity: Granularity::Monthly,
            current_total: current,
            previous_total: previous,
            current_categories: vec![],
            previous_categories: vec![],
            weekday: WeekdaySplit::default(),
            first_week_total: 0.0,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 20).unwrap()
    }

    struct AlwaysRule;

    impl Rule for AlwaysRule {
        fn kind(&self) -> InsightKind {
            InsightKind::Improvement
        }

        fn name(&self) -> &'static str {
            "Always"
        }

        fn evaluate(&self, _ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
            vec![DerivedInsight::new(
                InsightKind::Improvement,
                Severity::Info,
                Feature::BasicAnalytics,
                "always",
            )]
        }
    }

    #[test]
    fn test_engine_registers_builtin_rules() {
        let kinds = InsightEngine::new().rule_kinds();
        assert_eq!(
            kinds,
            vec![
                InsightKind::WeekendSkew,
                InsightKind::CategoryGrowth,
                InsightKind::FrontLoadedMonth,
                InsightKind::Improvement,
                InsightKind::BudgetAlert,
                InsightKind::PredictiveOverspend,
            ]
        );
    }

    #[test]
    fn test_empty_aggregates_produce_nothing() {
        let agg = aggregates(0.0, 0.0);
        let ctx = AnalysisContext::new(&agg, &[], today());
        assert!(InsightEngine::new().analyze(&ctx).is_empty());
    }

    #[test]
    fn test_all_matching_rules_fire() {
        let mut agg = aggregates(400.0, 1000.0);
        agg.weekday = WeekdaySplit {
            weekday_total: 100.0,
            weekend_total: 300.0,
        };
        agg.first_week_total = 200.0;
        agg.current_categories = vec![CategoryTotal {
            category: Category::Food,
            amount: 300.0,
            transaction_count: 3,
            percentage: 75.0,
        }];
        agg.previous_categories = vec![CategoryTotal {
            category: Category::Food,
            amount: 100.0,
            transaction_count: 2,
            percentage: 10.0,
        }];

        let ctx = AnalysisContext::new(&agg, &[], today());
        let kinds: Vec<InsightKind> = InsightEngine::new()
            .analyze(&ctx)
            .into_iter()
            .map(|i| i.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                InsightKind::WeekendSkew,
                InsightKind::CategoryGrowth,
                InsightKind::FrontLoadedMonth,
                InsightKind::Improvement,
            ]
        );
    }

    #[test]
    fn test_custom_rule_registration() {
        let mut engine = InsightEngine::empty();
        engine.register(Box::new(AlwaysRule));
        let agg = aggregates(0.0, 0.0);
        let ctx = AnalysisContext::new(&agg, &[], today());
        let found = engine.analyze(&ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "always");
    }

    #[test]
    fn test_change_percent_uses_period_change() {
        assert_eq!(aggregates(50.0, 0.0).change_percent(), 100.0);
        assert_eq!(aggregates(0.0, 0.0).change_percent(), 0.0);
    }
}
