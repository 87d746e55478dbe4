//! Dashboard analytics
//!
//! Composes the pieces for one user: records from a [`FinanceStore`] are
//! partitioned into windows, measured, run through the insight engine and
//! filtered by the entitlement gate. Nothing here writes back to the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::InsightPromptInput;
use crate::config::Config;
use crate::entitlement::gate_insights;
use crate::error::{Error, Result};
use crate::insights::{
    milestone_insight, next_milestone_insight, AnalysisContext, DerivedInsight, InsightEngine,
    PeriodAggregates, RuleThresholds,
};
use crate::metrics::{
    budget_overview, goal_metrics, goal_progress, subscription_overview, BudgetOverview,
    CategoryTotal, GoalMetrics, SubscriptionOverview,
};
use crate::models::{AccountTier, Budget, SavingsGoal, Transaction};
use crate::periods::{daily_series, partition_for, DateWindow, Granularity, WeekStart, WeekdaySplit};
use crate::store::FinanceStore;

/// Inputs that shape a report besides the records themselves
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub granularity: Granularity,
    pub week_start: WeekStart,
    pub thresholds: RuleThresholds,
    /// Renewals due within this many days are "upcoming"
    pub upcoming_days: i64,
    pub now: DateTime<Utc>,
}

impl ReportOptions {
    pub fn new(granularity: Granularity, now: DateTime<Utc>) -> Self {
        Self {
            granularity,
            week_start: WeekStart::default(),
            thresholds: RuleThresholds::default(),
            upcoming_days: 7,
            now,
        }
    }

    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Self {
        Self {
            granularity: config.periods.default_granularity,
            week_start: config.periods.week_start,
            thresholds: config.insights,
            upcoming_days: config.upcoming_days,
            now,
        }
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Everything the dashboard shows for one window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub tier: AccountTier,
    pub granularity: Granularity,
    pub current_window: DateWindow,
    pub previous_window: DateWindow,
    pub current_total: f64,
    pub previous_total: f64,
    pub change_percent: f64,
    pub transaction_count: usize,
    pub categories: Vec<CategoryTotal>,
    pub weekday: WeekdaySplit,
    pub daily: Vec<DailyTotal>,
    pub budgets: BudgetOverview,
    pub goals: Vec<GoalMetrics>,
    pub subscriptions: SubscriptionOverview,
    /// Insights visible to `tier`, in rule order
    pub insights: Vec<DerivedInsight>,
    /// Insights withheld by the entitlement gate
    pub hidden_insights: usize,
}

/// Every insight for the records, before gating
///
/// Rule engine output first, then one next-milestone nudge per open goal.
pub fn raw_insights(
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[SavingsGoal],
    options: &ReportOptions,
) -> Vec<DerivedInsight> {
    let partition = partition_for(
        transactions,
        options.granularity,
        options.today(),
        options.week_start,
    );
    let aggregates = PeriodAggregates::from_partition(options.granularity, &partition);
    let ctx = AnalysisContext::new(&aggregates, budgets, options.today());

    let mut insights = InsightEngine::with_thresholds(options.thresholds).analyze(&ctx);
    insights.extend(
        goals
            .iter()
            .filter(|g| !g.is_completed())
            .filter_map(next_milestone_insight),
    );
    insights
}

/// Gated insights for the store's tier plus the count withheld
pub fn visible_insights(
    store: &dyn FinanceStore,
    options: &ReportOptions,
) -> Result<(Vec<DerivedInsight>, usize)> {
    let transactions = store.list_transactions()?;
    let budgets = store.list_budgets()?;
    let goals = store.list_goals()?;
    let tier = store.account_tier()?;

    let all = raw_insights(&transactions, &budgets, &goals, options);
    let total = all.len();
    let visible = gate_insights(tier, all);
    let hidden = total - visible.len();
    Ok((visible, hidden))
}

pub fn build_report(store: &dyn FinanceStore, options: &ReportOptions) -> Result<DashboardReport> {
    let transactions = store.list_transactions()?;
    let budgets = store.list_budgets()?;
    let goals = store.list_goals()?;
    let subscriptions = store.list_subscriptions()?;
    let tier = store.account_tier()?;
    let today = options.today();

    let partition = partition_for(&transactions, options.granularity, today, options.week_start);
    let aggregates = PeriodAggregates::from_partition(options.granularity, &partition);

    let all = raw_insights(&transactions, &budgets, &goals, options);
    let total_insights = all.len();
    let insights = gate_insights(tier, all);

    let report = DashboardReport {
        tier,
        granularity: options.granularity,
        current_window: partition.current_window,
        previous_window: partition.previous_window,
        current_total: aggregates.current_total,
        previous_total: aggregates.previous_total,
        change_percent: aggregates.change_percent(),
        transaction_count: partition.current.len(),
        categories: aggregates.current_categories.clone(),
        weekday: aggregates.weekday,
        daily: daily_series(&partition.current, partition.current_window)
            .into_iter()
            .map(|(date, amount)| DailyTotal { date, amount })
            .collect(),
        budgets: budget_overview(&budgets),
        goals: goals.iter().map(|g| goal_metrics(g, options.now)).collect(),
        subscriptions: subscription_overview(&subscriptions, today, options.upcoming_days),
        hidden_insights: total_insights - insights.len(),
        insights,
    };

    debug!(
        granularity = %report.granularity,
        transactions = report.transaction_count,
        insights = report.insights.len(),
        hidden = report.hidden_insights,
        "Built dashboard report"
    );
    Ok(report)
}

/// Result of applying a contribution to a goal, without persisting it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionOutcome {
    pub goal_id: i64,
    pub name: String,
    pub previous_amount: f64,
    pub new_amount: f64,
    pub progress: f64,
    pub completed: bool,
    /// Set when the contribution crossed a milestone
    pub milestone: Option<DerivedInsight>,
}

/// Preview a contribution: new progress and any milestone it reaches
///
/// The store is not modified; persisting the new amount is the caller's job.
pub fn preview_contribution(
    store: &dyn FinanceStore,
    goal_id: i64,
    amount: f64,
) -> Result<ContributionOutcome> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::Validation(format!(
            "contribution must be a positive amount (got {})",
            amount
        )));
    }

    let goal = store.get_goal(goal_id)?;
    let tier = store.account_tier()?;
    let new_amount = goal.current_amount + amount;

    let milestone = milestone_insight(&goal, amount)
        .and_then(|insight| gate_insights(tier, vec![insight]).into_iter().next());

    Ok(ContributionOutcome {
        goal_id: goal.id,
        name: goal.name.clone(),
        previous_amount: goal.current_amount,
        new_amount,
        progress: goal_progress(new_amount, goal.target_amount),
        completed: goal.target_amount > 0.0 && new_amount >= goal.target_amount,
        milestone,
    })
}

/// Owned summary data for a coaching prompt
#[derive(Debug, Clone)]
pub struct CoachingData {
    /// Current-month transactions
    pub transactions: Vec<Transaction>,
    pub budget_total: f64,
    pub spent_total: f64,
    pub monthly_income: f64,
    pub goals: Vec<SavingsGoal>,
}

impl CoachingData {
    pub fn prompt_input<'a>(&'a self, focus: Option<&'a str>) -> InsightPromptInput<'a> {
        InsightPromptInput {
            transactions: &self.transactions,
            budget_total: self.budget_total,
            spent_total: self.spent_total,
            monthly_income: self.monthly_income,
            goals: &self.goals,
            focus,
        }
    }
}

/// Gather this month's data for the coach
///
/// A missing income reads as 0 so the prompt builder rejects it with its
/// usual validation error.
pub fn coaching_data(store: &dyn FinanceStore, options: &ReportOptions) -> Result<CoachingData> {
    let transactions = store.list_transactions()?;
    let budgets = store.list_budgets()?;
    let partition = partition_for(
        &transactions,
        Granularity::Monthly,
        options.today(),
        options.week_start,
    );
    let overview = budget_overview(&budgets);

    Ok(CoachingData {
        transactions: partition.current.into_iter().cloned().collect(),
        budget_total: overview.total_limit,
        spent_total: overview.total_spent,
        monthly_income: store.monthly_income()?.unwrap_or(0.0),
        goals: store.list_goals()?,
    })
}
