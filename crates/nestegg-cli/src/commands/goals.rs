//! Savings goal command implementations

use anyhow::{Context, Result};
use nestegg_core::analytics::preview_contribution;
use nestegg_core::metrics::{goal_metrics, GoalMetrics};
use nestegg_core::FinanceStore;

use super::session::{print_json, Session};
use super::truncate;

/// Ten-cell progress bar
fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 10.0).round() as usize).min(10);
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

pub fn cmd_goals(session: &Session, json: bool) -> Result<()> {
    let goals = session.store.list_goals()?;
    let metrics: Vec<GoalMetrics> = goals.iter().map(|g| goal_metrics(g, session.now)).collect();

    if json {
        return print_json(&metrics);
    }

    if metrics.is_empty() {
        println!("No savings goals in this ledger.");
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");

    for (goal, m) in goals.iter().zip(&metrics) {
        println!(
            "   {:>3} {:20} {} {:>5.1}%  ${:.2} of ${:.2}",
            goal.id,
            truncate(&goal.name, 20),
            progress_bar(m.progress),
            m.progress,
            goal.current_amount,
            goal.target_amount
        );

        if m.completed {
            println!("       ✅ Fully funded");
            continue;
        }

        match (m.days_remaining, m.weekly_savings_needed) {
            (Some(days), Some(weekly)) if days > 0 => {
                println!("       {} days left, save ${:.2}/week to finish", days, weekly)
            }
            (Some(_), _) => println!("       ⏰ Deadline passed, ${:.2} to go", m.remaining_clamped()),
            _ => {}
        }

        if let Some(next) = m.next_milestone {
            println!(
                "       Next: {}% in ${:.2}",
                next.threshold, next.amount_needed
            );
        }
    }

    Ok(())
}

pub fn cmd_contribute(session: &Session, goal_id: i64, amount: f64, json: bool) -> Result<()> {
    let outcome = preview_contribution(&session.store, goal_id, amount)
        .with_context(|| format!("Cannot contribute to goal {}", goal_id))?;

    if json {
        return print_json(&outcome);
    }

    println!();
    println!("🎯 {} + ${:.2}", outcome.name, amount);
    println!(
        "   ${:.2} → ${:.2} ({:.1}%)",
        outcome.previous_amount, outcome.new_amount, outcome.progress
    );

    if let Some(milestone) = &outcome.milestone {
        println!("   🎉 {}", milestone.message);
    } else if outcome.completed {
        println!("   ✅ Goal fully funded");
    }

    println!();
    println!("   (Preview only; record the contribution in your ledger to keep it.)");
    Ok(())
}
