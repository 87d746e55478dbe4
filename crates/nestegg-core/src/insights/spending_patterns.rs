//! Behavioral spending patterns
//!
//! - **Weekend skew** - weekend days cost noticeably more than weekdays
//! - **Front-loaded month** - most of a month's spending lands in days 1–7

use crate::entitlement::Feature;

use super::engine::{AnalysisContext, Rule};
use super::types::{DerivedInsight, InsightKind, Severity};
use crate::periods::Granularity;

/// Flags weekends that outspend the weekday pace
pub struct WeekendSkewRule {
    /// Weekend total must exceed weekday total times this (default 0.4)
    ratio: f64,
}

impl WeekendSkewRule {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }
}

impl Default for WeekendSkewRule {
    fn default() -> Self {
        Self::new(0.4)
    }
}

/// Weekend spend relative to two average weekdays, as a rounded percent
pub fn weekend_overspend_percent(weekend_total: f64, weekday_total: f64) -> f64 {
    let two_weekdays = (weekday_total / 5.0) * 2.0;
    (weekend_total / two_weekdays * 100.0 - 100.0).round()
}

impl Rule for WeekendSkewRule {
    fn kind(&self) -> InsightKind {
        InsightKind::WeekendSkew
    }

    fn name(&self) -> &'static str {
        "Weekend Skew"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        let split = ctx.aggregates.weekday;

        // Without weekday spending there is no pace to compare against
        if split.weekday_total <= 0.0 {
            return vec![];
        }

        if split.weekend_total <= split.weekday_total * self.ratio {
            return vec![];
        }

        let percent = weekend_overspend_percent(split.weekend_total, split.weekday_total);
        vec![DerivedInsight::new(
            InsightKind::WeekendSkew,
            Severity::Attention,
            Feature::SpendingPatterns,
            format!(
                "You spend {:.0}% more on weekends than on weekdays. Planning weekend activities ahead could help you save.",
                percent
            ),
        )
        .with_metric("weekend_overspend_percent", percent)]
    }
}

/// Flags months where the first week eats most of the spending
pub struct FrontLoadedMonthRule {
    /// Share of the period total, in percent (default 35)
    threshold_percent: f64,
}

impl FrontLoadedMonthRule {
    pub fn new(threshold_percent: f64) -> Self {
        Self { threshold_percent }
    }
}

impl Default for FrontLoadedMonthRule {
    fn default() -> Self {
        Self::new(35.0)
    }
}

impl Rule for FrontLoadedMonthRule {
    fn kind(&self) -> InsightKind {
        InsightKind::FrontLoadedMonth
    }

    fn name(&self) -> &'static str {
        "Front-Loaded Month"
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Vec<DerivedInsight> {
        let agg = ctx.aggregates;
        if agg.granularity != Granularity::Monthly || agg.current_total <= 0.0 {
            return vec![];
        }

        let share = agg.first_week_total / agg.current_total * 100.0;
        if share <= self.threshold_percent {
            return vec![];
        }

        vec![DerivedInsight::new(
            InsightKind::FrontLoadedMonth,
            Severity::Info,
            Feature::SpendingPatterns,
            format!(
                "{:.0}% of this month's spending happened in the first week. Spreading purchases across the month can ease cash flow.",
                share.round()
            ),
        )
        .with_metric("first_week_share_percent", share)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::engine::PeriodAggregates;
    use crate::periods::WeekdaySplit;
    use chrono::NaiveDate;

    fn aggregates(granularity: Granularity, total: f64) -> PeriodAggregates {
        PeriodAggregates {
            granularity,
            current_total: total,
            previous_total: 0.0,
            current_categories: vec![],
            previous_categories: vec![],
            weekday: WeekdaySplit::default(),
            first_week_total: 0.0,
        }
    }

    fn run(rule: &dyn Rule, agg: &PeriodAggregates) -> Vec<DerivedInsight> {
        let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        rule.evaluate(&AnalysisContext::new(agg, &[], today))
    }

    #[test]
    fn test_weekend_overspend_formula() {
        // Two average weekdays cost 40, weekend cost 100 → 150% more
        assert_eq!(weekend_overspend_percent(100.0, 100.0), 150.0);
        assert_eq!(weekend_overspend_percent(50.0, 100.0), 25.0);
    }

    #[test]
    fn test_weekend_skew_fires_above_ratio() {
        let mut agg = aggregates(Granularity::Weekly, 200.0);
        agg.weekday = WeekdaySplit {
            weekday_total: 100.0,
            weekend_total: 100.0,
        };
        let found = run(&WeekendSkewRule::default(), &agg);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.starts_with("You spend 150% more on weekends"));
        assert_eq!(found[0].metric.as_ref().unwrap().value, 150.0);
    }

    #[test]
    fn test_weekend_skew_quiet_at_ratio() {
        let mut agg = aggregates(Granularity::Weekly, 140.0);
        agg.weekday = WeekdaySplit {
            weekday_total: 100.0,
            weekend_total: 40.0,
        };
        assert!(run(&WeekendSkewRule::default(), &agg).is_empty());
    }

    #[test]
    fn test_weekend_skew_skipped_without_weekdays() {
        let mut agg = aggregates(Granularity::Weekly, 80.0);
        agg.weekday = WeekdaySplit {
            weekday_total: 0.0,
            weekend_total: 80.0,
        };
        assert!(run(&WeekendSkewRule::default(), &agg).is_empty());
    }

    #[test]
    fn test_front_loaded_only_monthly() {
        let mut agg = aggregates(Granularity::Quarterly, 100.0);
        agg.first_week_total = 90.0;
        assert!(run(&FrontLoadedMonthRule::default(), &agg).is_empty());

        agg.granularity = Granularity::Monthly;
        let found = run(&FrontLoadedMonthRule::default(), &agg);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.starts_with("90% of this month's spending"));
    }

    #[test]
    fn test_front_loaded_threshold_is_strict() {
        let mut agg = aggregates(Granularity::Monthly, 100.0);
        agg.first_week_total = 35.0;
        assert!(run(&FrontLoadedMonthRule::default(), &agg).is_empty());
    }
}
