//! Savings goal milestones
//!
//! A contribution is applied as one step: even if it jumps over several
//! thresholds, only the lowest crossed threshold is reported.

use serde::{Deserialize, Serialize};

use crate::entitlement::Feature;
use crate::models::SavingsGoal;

use super::types::{DerivedInsight, InsightKind, Severity};

/// Progress thresholds, in percent of target
pub const MILESTONES: [u8; 4] = [25, 50, 75, 100];

/// A threshold crossed by a contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneEvent {
    pub threshold: u8,
    pub old_percent: f64,
    pub new_percent: f64,
}

/// The next threshold not yet reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NextMilestone {
    pub threshold: u8,
    pub amount_needed: f64,
}

fn percent_of(amount: f64, target: f64) -> f64 {
    amount / target * 100.0
}

/// Lowest threshold with old% < threshold ≤ new%
pub fn detect_milestone(current: f64, contribution: f64, target: f64) -> Option<MilestoneEvent> {
    if target <= 0.0 || contribution <= 0.0 {
        return None;
    }

    let old_percent = percent_of(current, target);
    let new_percent = percent_of(current + contribution, target);

    MILESTONES
        .iter()
        .find(|&&t| old_percent < t as f64 && new_percent >= t as f64)
        .map(|&threshold| MilestoneEvent {
            threshold,
            old_percent,
            new_percent,
        })
}

pub fn next_milestone(current: f64, target: f64) -> Option<NextMilestone> {
    if target <= 0.0 {
        return None;
    }

    let progress = percent_of(current, target);
    MILESTONES
        .iter()
        .find(|&&t| progress < t as f64)
        .map(|&threshold| NextMilestone {
            threshold,
            amount_needed: target * threshold as f64 / 100.0 - current,
        })
}

pub fn milestone_message(threshold: u8, goal_name: &str) -> String {
    match threshold {
        25 => format!("You've reached 25% of your {} goal. Great start!", goal_name),
        50 => format!("Halfway there! You've saved 50% toward {}.", goal_name),
        75 => format!("75% of {} saved. The finish line is in sight!", goal_name),
        _ => format!("Congratulations! You've fully funded {}.", goal_name),
    }
}

/// Insight for a contribution to `goal`, if it crosses a threshold
pub fn milestone_insight(goal: &SavingsGoal, contribution: f64) -> Option<DerivedInsight> {
    let event = detect_milestone(goal.current_amount, contribution, goal.target_amount)?;
    tracing::debug!(
        goal = %goal.name,
        threshold = event.threshold,
        "Milestone reached"
    );

    Some(
        DerivedInsight::new(
            InsightKind::Milestone,
            Severity::Positive,
            Feature::SavingsGoals,
            milestone_message(event.threshold, &goal.name),
        )
        .with_metric("milestone_percent", event.threshold as f64),
    )
}

/// "Save $X more to reach N%" for `goal`
pub fn next_milestone_insight(goal: &SavingsGoal) -> Option<DerivedInsight> {
    let next = next_milestone(goal.current_amount, goal.target_amount)?;
    Some(
        DerivedInsight::new(
            InsightKind::NextMilestone,
            Severity::Info,
            Feature::SavingsGoals,
            format!(
                "Save ${:.2} more to reach {}% of {}.",
                next.amount_needed, next.threshold, goal.name
            ),
        )
        .with_metric("amount_needed", next.amount_needed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn goal(current: f64, target: f64) -> SavingsGoal {
        SavingsGoal {
            id: 7,
            name: "Vacation".to_string(),
            target_amount: target,
            current_amount: current,
            deadline: None,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_single_threshold_crossed() {
        let event = detect_milestone(20.0, 10.0, 100.0).unwrap();
        assert_eq!(event.threshold, 25);
        assert_eq!(event.old_percent, 20.0);
        assert_eq!(event.new_percent, 30.0);
    }

    #[test]
    fn test_multiple_thresholds_report_lowest_only() {
        let event = detect_milestone(10.0, 80.0, 100.0).unwrap();
        assert_eq!(event.threshold, 25);
    }

    #[test]
    fn test_no_threshold_crossed() {
        assert!(detect_milestone(26.0, 10.0, 100.0).is_none());
        // Already sitting on a threshold does not re-fire it
        assert!(detect_milestone(25.0, 5.0, 100.0).is_none());
        assert!(detect_milestone(10.0, 0.0, 100.0).is_none());
        assert!(detect_milestone(10.0, 10.0, 0.0).is_none());
    }

    #[test]
    fn test_landing_exactly_on_threshold() {
        assert_eq!(detect_milestone(40.0, 10.0, 100.0).unwrap().threshold, 50);
        assert_eq!(detect_milestone(90.0, 10.0, 100.0).unwrap().threshold, 100);
    }

    #[test]
    fn test_milestone_insight_one_per_contribution() {
        let insight = milestone_insight(&goal(10.0, 100.0), 80.0).unwrap();
        assert_eq!(insight.kind, InsightKind::Milestone);
        assert_eq!(
            insight.message,
            "You've reached 25% of your Vacation goal. Great start!"
        );
    }

    #[test]
    fn test_next_milestone_amount() {
        let next = next_milestone(30.0, 200.0).unwrap();
        assert_eq!(next.threshold, 25);
        assert_eq!(next.amount_needed, 20.0);

        let next = next_milestone(50.0, 200.0).unwrap();
        assert_eq!(next.threshold, 50);
        assert_eq!(next.amount_needed, 50.0);

        assert!(next_milestone(200.0, 200.0).is_none());
    }

    #[test]
    fn test_next_milestone_insight_message() {
        let insight = next_milestone_insight(&goal(60.0, 100.0)).unwrap();
        assert_eq!(insight.message, "Save $15.00 more to reach 75% of Vacation.");
        assert!(next_milestone_insight(&goal(100.0, 100.0)).is_none());
    }
}
