//! Nestegg CLI - Personal finance metrics and coaching
//!
//! Usage:
//!   nestegg report --period weekly    Dashboard for the current week
//!   nestegg insights                  Insights for the account tier
//!   nestegg contribute 3 250          Preview a savings contribution
//!   nestegg coach --focus groceries   AI read on this month's spending

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use nestegg_core::PromptLibrary;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // Commands that don't need a ledger
    match &cli.command {
        Commands::Prompts { action } => {
            return match action {
                None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
                Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(prompt_id),
                Some(PromptsAction::Path) => commands::cmd_prompts_path(),
            };
        }
        Commands::Ai {
            action: AiAction::Status,
        } => {
            let config = commands::load_config(cli.config.as_deref())?;
            return commands::cmd_ai_status(&config).await;
        }
        _ => {}
    }

    let session = commands::open_session(
        &cli.ledger,
        cli.csv.as_deref(),
        cli.config.as_deref(),
        cli.today.as_deref(),
    )?;
    let json = cli.json;

    match cli.command {
        Commands::Report { period } => {
            let granularity = commands::resolve_granularity(&session, period.as_deref())?;
            commands::cmd_report(&session, granularity, json)
        }
        Commands::Insights { period } => {
            let granularity = commands::resolve_granularity(&session, period.as_deref())?;
            commands::cmd_insights(&session, granularity, json)
        }
        Commands::Budgets => commands::cmd_budgets(&session, json),
        Commands::Goals => commands::cmd_goals(&session, json),
        Commands::Subscriptions { days } => commands::cmd_subscriptions(&session, days, json),
        Commands::Contribute { goal_id, amount } => {
            commands::cmd_contribute(&session, goal_id, amount, json)
        }
        Commands::Coach { focus } => {
            let client = commands::require_ai_client(&session.config)?;
            commands::cmd_coach(&session, client, PromptLibrary::new(), focus.as_deref(), json)
                .await
        }
        Commands::Recommend { focus } => {
            let client = commands::require_ai_client(&session.config)?;
            commands::cmd_recommend(&session, client, PromptLibrary::new(), focus.as_deref(), json)
                .await
        }
        Commands::Prompts { .. } | Commands::Ai { .. } => Ok(()),
    }
}
