//! Metric calculators
//!
//! Pure functions from entity collections to scalars and percentages. Every
//! function here is total: empty or degenerate input yields a zero/neutral
//! result, never an error or a panic.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::insights::milestones::{next_milestone, NextMilestone};
use crate::models::{Budget, Category, SavingsGoal, Subscription, Transaction};

const SECONDS_PER_DAY: i64 = 86_400;

/// Round to whole cents for display
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clamp a percentage into [0, 100] for display
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

// ========== Budgets ==========

/// Budget health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

/// spent / limit × 100, uncapped. A non-positive limit yields 0.
pub fn budget_utilization(spent: f64, limit: f64) -> f64 {
    if limit <= 0.0 {
        return 0.0;
    }
    (spent / limit) * 100.0
}

/// Exceeded once spent reaches the limit, including a zero limit
pub fn budget_status(budget: &Budget) -> BudgetStatus {
    if budget.spent >= budget.monthly_limit {
        BudgetStatus::Exceeded
    } else if budget_utilization(budget.spent, budget.monthly_limit) >= budget.alert_threshold {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Ok
    }
}

/// Derived numbers for one budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetMetrics {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
    /// Raw utilization, may exceed 100
    pub utilization: f64,
    pub status: BudgetStatus,
}

impl BudgetMetrics {
    pub fn display_percent(&self) -> f64 {
        clamp_percent(self.utilization)
    }
}

pub fn budget_metrics(budget: &Budget) -> BudgetMetrics {
    BudgetMetrics {
        category: budget.category.clone(),
        limit: budget.monthly_limit,
        spent: budget.spent,
        remaining: budget.monthly_limit - budget.spent,
        utilization: budget_utilization(budget.spent, budget.monthly_limit),
        status: budget_status(budget),
    }
}

/// Totals across all budgets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub total_limit: f64,
    pub total_spent: f64,
    pub total_remaining: f64,
    pub utilization: f64,
    pub ok_count: usize,
    pub warning_count: usize,
    pub exceeded_count: usize,
    pub budgets: Vec<BudgetMetrics>,
}

pub fn budget_overview(budgets: &[Budget]) -> BudgetOverview {
    let mut overview = BudgetOverview::default();

    for budget in budgets {
        let metrics = budget_metrics(budget);
        overview.total_limit += metrics.limit;
        overview.total_spent += metrics.spent;
        match metrics.status {
            BudgetStatus::Ok => overview.ok_count += 1,
            BudgetStatus::Warning => overview.warning_count += 1,
            BudgetStatus::Exceeded => overview.exceeded_count += 1,
        }
        overview.budgets.push(metrics);
    }

    overview.total_remaining = overview.total_limit - overview.total_spent;
    overview.utilization = budget_utilization(overview.total_spent, overview.total_limit);
    overview
}

// ========== Goals ==========

/// min(current / target × 100, 100); a non-positive target yields 0
pub fn goal_progress(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    ((current / target) * 100.0).clamp(0.0, 100.0)
}

/// Whole days until the deadline (taken at 00:00 UTC), rounded up
pub fn days_remaining(deadline: Option<NaiveDate>, now: DateTime<Utc>) -> Option<i64> {
    let deadline = deadline?.and_hms_opt(0, 0, 0)?.and_utc();
    let seconds = (deadline - now).num_seconds();
    Some(ceil_div(seconds, SECONDS_PER_DAY))
}

fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b > 0 {
        q + 1
    } else {
        q
    }
}

/// (target − current) / max(days, 1) × 7, never negative
pub fn weekly_savings_needed(current: f64, target: f64, days_remaining: i64) -> f64 {
    let outstanding = (target - current).max(0.0);
    outstanding / days_remaining.max(1) as f64 * 7.0
}

/// Derived numbers for one savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalMetrics {
    pub goal_id: i64,
    pub name: String,
    pub progress: f64,
    /// target − current, negative once overfunded
    pub remaining: f64,
    pub completed: bool,
    pub days_remaining: Option<i64>,
    pub weekly_savings_needed: Option<f64>,
    pub next_milestone: Option<NextMilestone>,
}

impl GoalMetrics {
    pub fn remaining_clamped(&self) -> f64 {
        self.remaining.max(0.0)
    }
}

pub fn goal_metrics(goal: &SavingsGoal, now: DateTime<Utc>) -> GoalMetrics {
    let days = days_remaining(goal.deadline, now);
    GoalMetrics {
        goal_id: goal.id,
        name: goal.name.clone(),
        progress: goal_progress(goal.current_amount, goal.target_amount),
        remaining: goal.target_amount - goal.current_amount,
        completed: goal.is_completed(),
        days_remaining: days,
        weekly_savings_needed: days
            .map(|d| weekly_savings_needed(goal.current_amount, goal.target_amount, d)),
        next_milestone: next_milestone(goal.current_amount, goal.target_amount),
    }
}

// ========== Subscriptions ==========

pub fn annualized_cost(subscription: &Subscription) -> f64 {
    subscription.amount * subscription.billing_cycle.multiplier()
}

pub fn monthly_equivalent(subscription: &Subscription) -> f64 {
    annualized_cost(subscription) / 12.0
}

/// Active subscription totals plus renewals coming up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionOverview {
    pub active_count: usize,
    pub monthly_total: f64,
    pub annual_total: f64,
    pub upcoming: Vec<UpcomingRenewal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingRenewal {
    pub subscription_id: i64,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub days_until: i64,
}

pub fn subscription_overview(
    subscriptions: &[Subscription],
    today: NaiveDate,
    horizon_days: i64,
) -> SubscriptionOverview {
    let mut overview = SubscriptionOverview::default();
    let horizon_end = today + Duration::days(horizon_days);

    for sub in subscriptions.iter().filter(|s| s.active) {
        overview.active_count += 1;
        overview.annual_total += annualized_cost(sub);

        if sub.next_billing_date >= today && sub.next_billing_date <= horizon_end {
            overview.upcoming.push(UpcomingRenewal {
                subscription_id: sub.id,
                name: sub.name.clone(),
                amount: sub.amount,
                date: sub.next_billing_date,
                days_until: (sub.next_billing_date - today).num_days(),
            });
        }
    }

    overview.monthly_total = overview.annual_total / 12.0;
    overview
        .upcoming
        .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    overview
}

// ========== Spending ==========

/// (current − previous) / previous × 100; previous = 0 gives 100 or 0
pub fn period_change(current_total: f64, previous_total: f64) -> f64 {
    if previous_total == 0.0 {
        return if current_total > 0.0 { 100.0 } else { 0.0 };
    }
    ((current_total - previous_total) / previous_total) * 100.0
}

pub fn total_spent(transactions: &[&Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}

/// Spending for one category in a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    pub transaction_count: usize,
    /// Share of the overall total, 0–100
    pub percentage: f64,
}

/// Per-category totals, largest first
pub fn category_breakdown(transactions: &[&Transaction]) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<Category, (f64, usize)> = HashMap::new();
    for tx in transactions {
        let entry = by_category.entry(tx.category).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    let total = total_spent(transactions);
    let mut breakdown: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category,
            amount,
            transaction_count: count,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    breakdown.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    breakdown
}

pub fn top_categories(transactions: &[&Transaction], n: usize) -> Vec<CategoryTotal> {
    let mut breakdown = category_breakdown(transactions);
    breakdown.truncate(n);
    breakdown
}
