//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use chrono::{Datelike, Timelike};
use nestegg_core::test_utils::MockChatServer;
use nestegg_core::{AIClient, Granularity, PromptLibrary};
use tempfile::TempDir;

use crate::commands::{self, truncate, Session};

const LEDGER: &str = r#"{
  "tier": "premium",
  "monthly_income": 3800.0,
  "transactions": [
    { "id": 1, "amount": 84.20, "category": "food", "description": "Farmers market", "occurred_at": "2026-10-03T10:15:00Z" },
    { "id": 2, "amount": 1200.0, "category": "housing", "description": "Rent", "occurred_at": "2026-10-01T08:00:00Z", "recurring": true },
    { "id": 3, "amount": 45.0, "category": "entertainment", "description": "Concert", "occurred_at": "2026-10-10T21:00:00Z" },
    { "id": 4, "amount": 62.5, "category": "food", "occurred_at": "2026-09-18T12:00:00Z" }
  ],
  "budgets": [
    { "category": "food", "monthly_limit": 400.0, "spent": 84.2 },
    { "category": "entertainment", "monthly_limit": 40.0, "spent": 45.0 }
  ],
  "goals": [
    { "id": 3, "name": "New bike", "target_amount": 800.0, "current_amount": 180.0, "deadline": "2027-04-01" }
  ],
  "subscriptions": [
    { "id": 1, "name": "Music", "amount": 10.99, "billing_cycle": "monthly", "next_billing_date": "2026-10-19" }
  ]
}"#;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "[subscriptions]\nupcoming_days = 7\n").unwrap();
        Self { dir, config }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn session(&self, ledger: &str) -> Session {
        let path = self.write("ledger.json", ledger);
        commands::open_session(&path, None, Some(self.config.as_path()), Some("2026-10-16"))
            .unwrap()
    }

    fn premium(&self) -> Session {
        self.session(LEDGER)
    }

    fn free(&self) -> Session {
        self.session(&LEDGER.replace("\"premium\"", "\"free\""))
    }
}

// ========== Utility Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Groceries", 20), "Groceries");
    assert_eq!(truncate("Emergency fund for the car", 12), "Emergency...");
    assert_eq!(truncate("Café crème brûlée", 8), "Café ...");
}

#[test]
fn test_resolve_now() {
    let now = commands::resolve_now(Some("2026-02-28")).unwrap();
    assert_eq!((now.year(), now.month(), now.day()), (2026, 2, 28));
    assert_eq!(now.hour(), 0);

    assert!(commands::resolve_now(Some("28/02/2026")).is_err());
    assert!(commands::resolve_now(None).is_ok());
}

// ========== Session Tests ==========

#[test]
fn test_open_session_from_ledger() {
    let fx = Fixture::new();
    let session = fx.premium();
    assert_eq!(session.today().to_string(), "2026-10-16");
    assert_eq!(session.config.upcoming_days, 7);
    assert_eq!(session.store.snapshot().transactions.len(), 4);
}

#[test]
fn test_open_session_missing_ledger() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("nope.json");
    let result = commands::open_session(&missing, None, Some(fx.config.as_path()), None);
    assert!(result.is_err());
}

#[test]
fn test_open_session_csv_only() {
    let fx = Fixture::new();
    let csv = fx.write(
        "bank.csv",
        "date,amount,category,description\n2026-10-05,12.00,food,Bagels\n2026-10-06,8.50,transport,Bus\n",
    );
    let missing = fx.dir.path().join("nope.json");

    let session = commands::open_session(
        &missing,
        Some(csv.as_path()),
        Some(fx.config.as_path()),
        Some("2026-10-16"),
    )
    .unwrap();
    assert_eq!(session.store.snapshot().transactions.len(), 2);
    assert!(commands::cmd_report(&session, Granularity::Monthly, false).is_ok());
}

#[test]
fn test_open_session_csv_updates_budget_spent() {
    let fx = Fixture::new();
    let ledger = fx.write("ledger.json", LEDGER);
    let csv = fx.write("bank.csv", "date,amount,category\n2026-10-12,15.80,groceries\n");

    let session = commands::open_session(
        &ledger,
        Some(csv.as_path()),
        Some(fx.config.as_path()),
        Some("2026-10-16"),
    )
    .unwrap();
    let food = &session.store.snapshot().budgets[0];
    assert!((food.spent - 100.0).abs() < 1e-9);
}

#[test]
fn test_open_session_bad_config_path() {
    let fx = Fixture::new();
    let ledger = fx.write("ledger.json", LEDGER);
    let missing = fx.dir.path().join("missing.toml");
    assert!(commands::open_session(&ledger, None, Some(missing.as_path()), None).is_err());
}

#[test]
fn test_resolve_granularity() {
    let fx = Fixture::new();
    let session = fx.premium();
    assert_eq!(
        commands::resolve_granularity(&session, None).unwrap(),
        Granularity::Monthly
    );
    assert_eq!(
        commands::resolve_granularity(&session, Some("week")).unwrap(),
        Granularity::Weekly
    );
    assert!(commands::resolve_granularity(&session, Some("fortnightly")).is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_report() {
    let fx = Fixture::new();
    let session = fx.premium();
    for granularity in [Granularity::Weekly, Granularity::Monthly, Granularity::Yearly] {
        assert!(commands::cmd_report(&session, granularity, false).is_ok());
    }
    assert!(commands::cmd_report(&session, Granularity::Quarterly, true).is_ok());
}

#[test]
fn test_cmd_insights() {
    let fx = Fixture::new();
    assert!(commands::cmd_insights(&fx.premium(), Granularity::Monthly, false).is_ok());
    assert!(commands::cmd_insights(&fx.free(), Granularity::Monthly, true).is_ok());
}

#[test]
fn test_cmd_budgets_goals_subscriptions() {
    let fx = Fixture::new();
    let session = fx.premium();
    assert!(commands::cmd_budgets(&session, false).is_ok());
    assert!(commands::cmd_budgets(&session, true).is_ok());
    assert!(commands::cmd_goals(&session, false).is_ok());
    assert!(commands::cmd_goals(&session, true).is_ok());
    assert!(commands::cmd_subscriptions(&session, None, false).is_ok());
    assert!(commands::cmd_subscriptions(&session, Some(30), true).is_ok());
}

#[test]
fn test_cmd_subscriptions_negative_days() {
    let fx = Fixture::new();
    assert!(commands::cmd_subscriptions(&fx.premium(), Some(-1), false).is_err());
}

#[test]
fn test_cmd_contribute() {
    let fx = Fixture::new();
    let session = fx.premium();
    assert!(commands::cmd_contribute(&session, 3, 40.0, false).is_ok());
    assert!(commands::cmd_contribute(&session, 3, 700.0, true).is_ok());
    assert!(commands::cmd_contribute(&session, 99, 10.0, false).is_err());
    assert!(commands::cmd_contribute(&session, 3, -5.0, false).is_err());

    // Preview only
    assert_eq!(session.store.snapshot().goals[0].current_amount, 180.0);
}

// ========== Coaching Command Tests ==========

fn mock_client(server: &MockChatServer) -> AIClient {
    AIClient::openai_compatible(&server.url(), "mock-coach")
}

#[tokio::test]
async fn test_cmd_coach_premium() {
    let fx = Fixture::new();
    let server = MockChatServer::start().await;

    let result = commands::cmd_coach(
        &fx.premium(),
        mock_client(&server),
        PromptLibrary::embedded_only(),
        Some("dining out"),
        false,
    )
    .await;
    assert!(result.is_ok());

    let sent = server.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].user.contains("Farmers market"));
    assert!(sent[0].user.contains("dining out"));
    // September spending is outside the coaching month
    assert!(!sent[0].user.contains("62.50"));
}

#[tokio::test]
async fn test_cmd_coach_free_tier_blocked() {
    let fx = Fixture::new();
    let server = MockChatServer::start().await;

    let result = commands::cmd_coach(
        &fx.free(),
        mock_client(&server),
        PromptLibrary::embedded_only(),
        None,
        false,
    )
    .await;
    assert!(result.is_err());
    assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn test_cmd_recommend_json() {
    let fx = Fixture::new();
    let server = MockChatServer::start().await;

    let result = commands::cmd_recommend(
        &fx.premium(),
        mock_client(&server),
        PromptLibrary::embedded_only(),
        None,
        true,
    )
    .await;
    assert!(result.is_ok());
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_cmd_coach_service_error() {
    let fx = Fixture::new();
    let server = MockChatServer::failing(500).await;

    let result = commands::cmd_coach(
        &fx.premium(),
        mock_client(&server),
        PromptLibrary::embedded_only(),
        None,
        false,
    )
    .await;
    assert!(result.is_err());
    // No retry
    assert_eq!(server.request_count(), 1);
}

// ========== Prompts Command Tests ==========

#[test]
fn test_list_prompts() {
    assert!(commands::list_prompts(&mut PromptLibrary::embedded_only()).is_ok());
}

#[test]
fn test_show_prompt() {
    let mut library = PromptLibrary::embedded_only();
    assert!(commands::show_prompt(&mut library, "spending_insight").is_ok());
    assert!(commands::show_prompt(&mut library, "savings_recommendations").is_ok());
    assert!(commands::show_prompt(&mut library, "explain_everything").is_err());
}
