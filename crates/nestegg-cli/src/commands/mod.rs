//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `budgets` - Budget utilization table
//! - `coach` - AI coaching commands (coach, recommend, ai status)
//! - `goals` - Savings goal progress and contribution preview
//! - `prompts` - Prompt library management commands
//! - `reports` - Dashboard report and insights
//! - `session` - Shared utilities (open_session, resolve_granularity, print_json)
//! - `subscriptions` - Subscription costs and renewals

pub mod budgets;
pub mod coach;
pub mod goals;
pub mod prompts;
pub mod reports;
pub mod session;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use budgets::*;
pub use coach::*;
pub use goals::*;
pub use prompts::*;
pub use reports::*;
pub use session::*;
pub use subscriptions::*;

/// Truncate a string to a maximum length in characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
