//! Serializes spending summaries into coaching prompts
//!
//! Input is validated before any template is loaded, so a degenerate request
//! never reaches the AI endpoint.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::metrics::{budget_utilization, goal_progress, top_categories};
use crate::models::{SavingsGoal, Transaction};
use crate::prompts::{PromptId, PromptLibrary};

use super::types::{ChatPrompt, InsightPromptInput};

/// Transactions listed verbatim in a prompt
pub const MAX_PROMPT_TRANSACTIONS: usize = 10;

/// Categories listed in a prompt
pub const TOP_CATEGORY_COUNT: usize = 3;

/// Reject input the coach cannot say anything useful about
pub fn validate_input(input: &InsightPromptInput<'_>) -> Result<()> {
    if input.transactions.is_empty() {
        return Err(Error::Validation(
            "at least one transaction is required to generate an insight".into(),
        ));
    }
    if input.budget_total <= 0.0 {
        return Err(Error::Validation(format!(
            "budget total must be positive (got {:.2})",
            input.budget_total
        )));
    }
    if input.monthly_income <= 0.0 {
        return Err(Error::Validation(format!(
            "monthly income must be positive (got {:.2})",
            input.monthly_income
        )));
    }
    Ok(())
}

/// Most recent first, capped at [`MAX_PROMPT_TRANSACTIONS`] with a count suffix
pub fn format_transactions(transactions: &[Transaction]) -> String {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

    let mut lines: Vec<String> = sorted
        .iter()
        .take(MAX_PROMPT_TRANSACTIONS)
        .map(|tx| {
            let mut line = format!(
                "- {} | {} | ${:.2}",
                tx.date(),
                tx.category.label(),
                tx.amount
            );
            if let Some(desc) = tx.description.as_deref().filter(|d| !d.trim().is_empty()) {
                line.push_str(" | ");
                line.push_str(desc.trim());
            }
            if tx.recurring {
                line.push_str(" (recurring)");
            }
            line
        })
        .collect();

    if sorted.len() > MAX_PROMPT_TRANSACTIONS {
        lines.push(format!(
            "...and {} more transactions",
            sorted.len() - MAX_PROMPT_TRANSACTIONS
        ));
    }

    lines.join("\n")
}

pub fn format_top_categories(transactions: &[Transaction]) -> String {
    let refs: Vec<&Transaction> = transactions.iter().collect();
    top_categories(&refs, TOP_CATEGORY_COUNT)
        .iter()
        .map(|c| {
            format!(
                "- {}: ${:.2} ({:.0}% of spending)",
                c.category.label(),
                c.amount,
                c.percentage
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Active goals only; completed ones have nothing left to coach on
pub fn format_goals(goals: &[SavingsGoal]) -> String {
    goals
        .iter()
        .filter(|g| !g.is_completed())
        .map(|g| {
            let mut line = format!(
                "- {}: ${:.2} of ${:.2} ({:.0}%)",
                g.name,
                g.current_amount,
                g.target_amount,
                goal_progress(g.current_amount, g.target_amount)
            );
            if let Some(deadline) = g.deadline {
                line.push_str(&format!(", due {}", deadline));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for a short read of the month plus bullet suggestions
pub fn build_insight_prompt(
    input: &InsightPromptInput<'_>,
    library: &mut PromptLibrary,
) -> Result<ChatPrompt> {
    build_prompt(PromptId::SpendingInsight, input, library)
}

/// Prompt asking for RECOMMENDATION / SAVINGS / DIFFICULTY records
pub fn build_savings_prompt(
    input: &InsightPromptInput<'_>,
    library: &mut PromptLibrary,
) -> Result<ChatPrompt> {
    build_prompt(PromptId::SavingsRecommendations, input, library)
}

fn build_prompt(
    id: PromptId,
    input: &InsightPromptInput<'_>,
    library: &mut PromptLibrary,
) -> Result<ChatPrompt> {
    validate_input(input)?;

    let income = format!("${:.2}", input.monthly_income);
    let budget_total = format!("${:.2}", input.budget_total);
    let spent_total = format!("${:.2}", input.spent_total);
    let utilization = format!(
        "{:.0}%",
        budget_utilization(input.spent_total, input.budget_total)
    );
    let categories = format_top_categories(input.transactions);
    let transactions = format_transactions(input.transactions);
    let goals = format_goals(input.goals);
    let focus = input.focus.map(str::trim).unwrap_or("");

    let mut vars: HashMap<&str, &str> = HashMap::new();
    vars.insert("income", &income);
    vars.insert("budget_total", &budget_total);
    vars.insert("spent_total", &spent_total);
    vars.insert("utilization", &utilization);
    vars.insert("top_categories", &categories);
    vars.insert("transactions", &transactions);
    vars.insert("goals", &goals);
    vars.insert("focus", focus);

    let prompt = library.get(id)?;
    let rendered = ChatPrompt {
        system: prompt.render_system(&vars),
        user: prompt.render_user(&vars),
    };

    tracing::debug!(
        prompt = id.as_str(),
        version = prompt.metadata.version,
        transactions = input.transactions.len(),
        "Built coaching prompt"
    );

    Ok(rendered)
}
