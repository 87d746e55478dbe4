//! Shared command utilities
//!
//! This module contains:
//! - `open_session` - Load config and ledger (plus optional CSV) for a command
//! - `resolve_granularity` - `--period` or the configured default
//! - `require_ai_client` - AI backend from config, or a helpful error

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use nestegg_core::{AIClient, Config, Granularity, MemoryStore, ReportOptions};
use serde::Serialize;
use tracing::debug;

/// Everything a command reads from
pub struct Session {
    pub store: MemoryStore,
    pub config: Config,
    /// Evaluation instant; `--today` pins it for reproducible output
    pub now: DateTime<Utc>,
}

impl Session {
    pub fn options(&self) -> ReportOptions {
        ReportOptions::from_config(&self.config, self.now)
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load config")
}

/// Parse `--today`, defaulting to the current time
pub fn resolve_now(today: Option<&str>) -> Result<DateTime<Utc>> {
    match today {
        Some(s) => {
            let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .context("Invalid --today date format (use YYYY-MM-DD)")?;
            Ok(date.and_time(NaiveTime::MIN).and_utc())
        }
        None => Ok(Utc::now()),
    }
}

/// Load the ledger snapshot, then append `csv` transactions if given
///
/// A missing ledger is fine when a CSV is supplied; budgets then start empty.
pub fn open_session(
    ledger: &Path,
    csv: Option<&Path>,
    config: Option<&Path>,
    today: Option<&str>,
) -> Result<Session> {
    let config = load_config(config)?;
    let now = resolve_now(today)?;

    let mut store = if ledger.exists() {
        MemoryStore::load_json(ledger)
            .with_context(|| format!("Failed to load ledger {}", ledger.display()))?
    } else if csv.is_some() {
        debug!(path = %ledger.display(), "No ledger file, starting from CSV only");
        MemoryStore::new()
    } else {
        bail!(
            "Ledger not found: {}. Pass --ledger <file> or --csv <file>.",
            ledger.display()
        );
    };

    if let Some(csv) = csv {
        let count = store
            .import_csv(csv)
            .with_context(|| format!("Failed to import {}", csv.display()))?;
        store.sync_budget_spent(now.date_naive());
        debug!(count, "Budget spent recomputed after CSV import");
    }

    Ok(Session { store, config, now })
}

/// `--period` if given, else the configured default
pub fn resolve_granularity(session: &Session, period: Option<&str>) -> Result<Granularity> {
    match period {
        Some(p) => p.parse().map_err(|e: String| anyhow!(e)),
        None => Ok(session.config.periods.default_granularity),
    }
}

/// AI backend from config, or an error explaining how to set one up
pub fn require_ai_client(config: &Config) -> Result<AIClient> {
    AIClient::from_config(&config.ai).ok_or_else(|| {
        anyhow!(
            "AI is not configured. Set [ai] host in the config file or NESTEGG_AI_HOST \
             (AI_BACKEND=mock runs offline)."
        )
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
