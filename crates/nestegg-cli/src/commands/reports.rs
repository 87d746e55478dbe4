//! Report command implementations

use anyhow::Result;
use nestegg_core::analytics::{build_report, visible_insights, DashboardReport};
use nestegg_core::{DerivedInsight, Granularity, Severity};
use serde::Serialize;

use super::session::{print_json, Session};
use super::truncate;

pub fn cmd_report(session: &Session, granularity: Granularity, json: bool) -> Result<()> {
    let options = session.options().with_granularity(granularity);
    let report = build_report(&session.store, &options)?;

    if json {
        return print_json(&report);
    }

    print_summary(&report);
    print_categories(&report);

    let b = &report.budgets;
    if !b.budgets.is_empty() {
        println!();
        println!(
            "   Budgets: ${:.2} of ${:.2} ({:.0}%) │ {} ok, {} warning, {} exceeded",
            b.total_spent, b.total_limit, b.utilization, b.ok_count, b.warning_count, b.exceeded_count
        );
    }

    let s = &report.subscriptions;
    if s.active_count > 0 {
        println!(
            "   Subscriptions: {} active │ ${:.2}/month │ ${:.2}/year",
            s.active_count, s.monthly_total, s.annual_total
        );
    }

    println!();
    print_insights(&report.insights, report.hidden_insights);
    Ok(())
}

fn print_summary(report: &DashboardReport) {
    println!();
    println!("📊 Spending This {}", capitalize(report.granularity.noun()));
    println!(
        "   Period: {} to {}",
        report.current_window.start, report.current_window.end
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Total: ${:.2} ({} transactions)",
        report.current_total, report.transaction_count
    );
    println!(
        "   Last {}: ${:.2} ({:+.1}%)",
        report.granularity.noun(),
        report.previous_total,
        report.change_percent
    );
    println!(
        "   Weekdays: ${:.2} │ Weekends: ${:.2}",
        report.weekday.weekday_total, report.weekday.weekend_total
    );
}

fn print_categories(report: &DashboardReport) {
    if report.categories.is_empty() {
        println!();
        println!("   No spending found in this period.");
        return;
    }

    println!();
    println!("   {:15} │ {:>10} │ {:>6} │ {:>5}", "Category", "Amount", "%", "Count");
    println!("   ────────────────┼────────────┼────────┼───────");
    for cat in &report.categories {
        println!(
            "   {:15} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            cat.category.label(),
            cat.amount,
            cat.percentage,
            cat.transaction_count
        );
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Positive => "🎉",
        Severity::Info => "💡",
        Severity::Attention => "👀",
        Severity::Warning => "⚠️ ",
    }
}

pub fn print_insights(insights: &[DerivedInsight], hidden: usize) {
    if insights.is_empty() {
        println!("✨ No insights right now.");
    } else {
        println!("✨ Insights");
        for insight in insights {
            println!(
                "   {} {}",
                severity_icon(insight.severity),
                truncate(&insight.message, 100)
            );
        }
    }

    if hidden > 0 {
        println!();
        println!(
            "   🔒 {} more insight{} available with a premium account",
            hidden,
            if hidden == 1 { "" } else { "s" }
        );
    }
}

#[derive(Serialize)]
struct InsightsOutput<'a> {
    granularity: Granularity,
    insights: &'a [DerivedInsight],
    hidden_insights: usize,
}

pub fn cmd_insights(session: &Session, granularity: Granularity, json: bool) -> Result<()> {
    let options = session.options().with_granularity(granularity);
    let (insights, hidden) = visible_insights(&session.store, &options)?;

    if json {
        return print_json(&InsightsOutput {
            granularity,
            insights: &insights,
            hidden_insights: hidden,
        });
    }

    println!();
    print_insights(&insights, hidden);
    Ok(())
}
