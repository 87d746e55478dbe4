//! Budget command implementations

use anyhow::Result;
use nestegg_core::metrics::{budget_overview, BudgetStatus};
use nestegg_core::FinanceStore;

use super::session::{print_json, Session};
use super::truncate;

pub fn cmd_budgets(session: &Session, json: bool) -> Result<()> {
    let budgets = session.store.list_budgets()?;
    let overview = budget_overview(&budgets);

    if json {
        return print_json(&overview);
    }

    if overview.budgets.is_empty() {
        println!("No budgets in this ledger.");
        return Ok(());
    }

    println!();
    println!("💰 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:18} │ {:>9} │ {:>9} │ {:>9} │ {:>5}",
        "Category", "Spent", "Limit", "Left", "Used"
    );
    println!("   ───────────────────┼───────────┼───────────┼───────────┼──────");

    for m in &overview.budgets {
        let icon = match m.status {
            BudgetStatus::Ok => "✅",
            BudgetStatus::Warning => "⚠️ ",
            BudgetStatus::Exceeded => "❌",
        };
        println!(
            "   {:18} │ {:>9.2} │ {:>9.2} │ {:>9.2} │ {:>4.0}% {}",
            truncate(&m.category, 18),
            m.spent,
            m.limit,
            m.remaining,
            m.display_percent(),
            icon
        );
    }

    println!();
    println!(
        "   Total: ${:.2} of ${:.2} ({:.0}%), ${:.2} left",
        overview.total_spent, overview.total_limit, overview.utilization, overview.total_remaining
    );

    Ok(())
}
