//! Subscription command implementations

use anyhow::{bail, Result};
use nestegg_core::metrics::{annualized_cost, subscription_overview};
use nestegg_core::FinanceStore;

use super::session::{print_json, Session};
use super::truncate;

pub fn cmd_subscriptions(session: &Session, days: Option<i64>, json: bool) -> Result<()> {
    let horizon = days.unwrap_or(session.config.upcoming_days);
    if horizon < 0 {
        bail!("--days must not be negative");
    }

    let subscriptions = session.store.list_subscriptions()?;
    let overview = subscription_overview(&subscriptions, session.today(), horizon);

    if json {
        return print_json(&overview);
    }

    if subscriptions.is_empty() {
        println!("No subscriptions in this ledger.");
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &subscriptions {
        let status_icon = if sub.active { "✅" } else { "❌" };
        println!(
            "   {} {:20} │ {:>8.2}/{:<7} │ ${:>8.2}/yr │ next {}",
            status_icon,
            truncate(&sub.name, 20),
            sub.amount,
            sub.billing_cycle.as_str(),
            annualized_cost(sub),
            sub.next_billing_date
        );
    }

    println!();
    println!(
        "   {} active │ ${:.2}/month │ ${:.2}/year",
        overview.active_count, overview.monthly_total, overview.annual_total
    );

    if overview.upcoming.is_empty() {
        println!("   No renewals in the next {} days.", horizon);
    } else {
        println!();
        println!("   Renewing in the next {} days:", horizon);
        for renewal in &overview.upcoming {
            let when = match renewal.days_until {
                0 => "today".to_string(),
                1 => "tomorrow".to_string(),
                n => format!("in {} days", n),
            };
            println!(
                "   🔔 {:20} ${:.2} {} ({})",
                truncate(&renewal.name, 20),
                renewal.amount,
                when,
                renewal.date
            );
        }
    }

    Ok(())
}
