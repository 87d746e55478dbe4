//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nestegg - See where your money goes
#[derive(Parser)]
#[command(name = "nestegg")]
#[command(about = "Personal finance metrics, insights and AI coaching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger snapshot (JSON export of transactions, budgets, goals, subscriptions)
    #[arg(long, default_value = "ledger.json", global = true)]
    pub ledger: PathBuf,

    /// Extra transactions to load from a CSV file (date,amount,category,description,recurring)
    ///
    /// Budget spent amounts are recomputed for the current month after import.
    #[arg(long, global = true)]
    pub csv: Option<PathBuf>,

    /// Config file (defaults to the platform config dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the dashboard: totals, categories, budgets, goals and insights
    Report {
        /// Window: weekly, monthly, quarterly, yearly (config default if omitted)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show insights visible to the account tier
    Insights {
        /// Window: weekly, monthly, quarterly, yearly (config default if omitted)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show budget utilization and status
    Budgets,

    /// Show savings goal progress
    Goals,

    /// Show subscription costs and upcoming renewals
    Subscriptions {
        /// Renewal horizon in days (config default if omitted)
        #[arg(short, long)]
        days: Option<i64>,
    },

    /// Preview a contribution to a savings goal
    Contribute {
        /// Savings goal ID
        goal_id: i64,

        /// Amount to add
        amount: f64,
    },

    /// Ask the AI coach for a read on this month's spending (premium)
    Coach {
        /// Topic to emphasize, e.g. "groceries"
        #[arg(short, long)]
        focus: Option<String>,
    },

    /// Ask the AI coach for concrete savings actions (premium)
    Recommend {
        /// Topic to emphasize, e.g. "subscriptions"
        #[arg(short, long)]
        focus: Option<String>,
    },

    /// Manage AI prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// AI backend commands
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., spending_insight)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Show the configured backend and check that it is reachable
    Status,
}
