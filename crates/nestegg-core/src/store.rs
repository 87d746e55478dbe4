//! Data access
//!
//! The core never writes records; it reads them through [`FinanceStore`],
//! which callers inject. [`MemoryStore`] is the in-process implementation
//! used by the CLI and tests, loaded from a JSON ledger snapshot and
//! optionally extended from a transactions CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{AccountTier, Budget, Category, SavingsGoal, Subscription, Transaction};

/// Read-only access to a user's financial records
pub trait FinanceStore: Send + Sync {
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    fn list_budgets(&self) -> Result<Vec<Budget>>;

    fn list_goals(&self) -> Result<Vec<SavingsGoal>>;

    fn list_subscriptions(&self) -> Result<Vec<Subscription>>;

    fn account_tier(&self) -> Result<AccountTier>;

    /// Self-reported monthly income, if the user provided one
    fn monthly_income(&self) -> Result<Option<f64>>;

    fn get_goal(&self, id: i64) -> Result<SavingsGoal> {
        self.list_goals()?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::NotFound(format!("savings goal {}", id)))
    }
}

/// Everything one user owns, as exported by the storage layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub tier: AccountTier,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl LedgerSnapshot {
    pub fn from_json(content: &str) -> Result<Self> {
        let snapshot: LedgerSnapshot = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            goals = snapshot.goals.len(),
            subscriptions = snapshot.subscriptions.len(),
            "Loaded ledger snapshot"
        );
        Ok(snapshot)
    }

    /// Amounts are non-negative everywhere in the ledger
    fn validate(&self) -> Result<()> {
        if let Some(tx) = self.transactions.iter().find(|t| t.amount < 0.0) {
            return Err(Error::InvalidData(format!(
                "transaction {} has negative amount {}",
                tx.id, tx.amount
            )));
        }
        if let Some(b) = self
            .budgets
            .iter()
            .find(|b| b.monthly_limit < 0.0 || b.spent < 0.0)
        {
            return Err(Error::InvalidData(format!(
                "budget '{}' has a negative limit or spent amount",
                b.category
            )));
        }
        if let Some(g) = self
            .goals
            .iter()
            .find(|g| g.target_amount < 0.0 || g.current_amount < 0.0)
        {
            return Err(Error::InvalidData(format!(
                "savings goal {} has a negative amount",
                g.id
            )));
        }
        if let Some(s) = self.subscriptions.iter().find(|s| s.amount < 0.0) {
            return Err(Error::InvalidData(format!(
                "subscription {} has negative amount {}",
                s.id, s.amount
            )));
        }
        Ok(())
    }
}

/// In-memory store over a [`LedgerSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ledger: LedgerSnapshot,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(ledger: LedgerSnapshot) -> Self {
        Self { ledger }
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        LedgerSnapshot::load(path).map(Self::from_snapshot)
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.ledger
    }

    pub fn with_tier(mut self, tier: AccountTier) -> Self {
        self.ledger.tier = tier;
        self
    }

    pub fn with_income(mut self, monthly_income: f64) -> Self {
        self.ledger.monthly_income = Some(monthly_income);
        self
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.ledger.transactions.push(transaction);
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.ledger.budgets.push(budget);
        self
    }

    pub fn with_goal(mut self, goal: SavingsGoal) -> Self {
        self.ledger.goals.push(goal);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.ledger.subscriptions.push(subscription);
        self
    }

    /// Append transactions from a CSV file, numbering them after existing ids
    pub fn import_csv(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)?;
        let first_id = self.next_transaction_id();
        let imported = parse_transactions_csv(file, first_id)?;
        let count = imported.len();
        self.ledger.transactions.extend(imported);
        info!(path = %path.display(), count, "Imported transactions");
        Ok(count)
    }

    fn next_transaction_id(&self) -> i64 {
        self.ledger
            .transactions
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |id| id + 1)
    }

    /// Recompute each budget's `spent` from transactions in `month`'s calendar month
    ///
    /// Budgets are matched to transactions by category name, leniently.
    pub fn sync_budget_spent(&mut self, month: NaiveDate) {
        for budget in &mut self.ledger.budgets {
            let category = Category::parse_lenient(&budget.category);
            budget.spent = self
                .ledger
                .transactions
                .iter()
                .filter(|t| t.category == category)
                .filter(|t| {
                    let d = t.date();
                    d.year() == month.year() && d.month() == month.month()
                })
                .map(|t| t.amount)
                .sum();
        }
    }
}

impl FinanceStore for MemoryStore {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.ledger.transactions.clone())
    }

    fn list_budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.ledger.budgets.clone())
    }

    fn list_goals(&self) -> Result<Vec<SavingsGoal>> {
        Ok(self.ledger.goals.clone())
    }

    fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        Ok(self.ledger.subscriptions.clone())
    }

    fn account_tier(&self) -> Result<AccountTier> {
        Ok(self.ledger.tier)
    }

    fn monthly_income(&self) -> Result<Option<f64>> {
        Ok(self.ledger.monthly_income)
    }
}

/// One CSV row; headers are matched case-insensitively
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    amount: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    recurring: Option<String>,
}

/// Parse `date,amount,category,description,recurring` rows into transactions
///
/// Dates may be `YYYY-MM-DD`, `MM/DD/YYYY` or RFC 3339. Amounts may carry a
/// `$` sign and thousands separators; bank-style negative debits are stored
/// as positive spending. Missing categories become `Other`.
pub fn parse_transactions_csv<R: Read>(reader: R, first_id: i64) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv::StringRecord::from(
        rdr.headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<Vec<_>>(),
    );

    let mut transactions = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = record.deserialize(Some(&headers))?;

        let occurred_at = parse_csv_date(&row.date).ok_or_else(|| {
            Error::InvalidData(format!("line {}: unrecognized date '{}'", line, row.date))
        })?;
        let amount = parse_csv_amount(&row.amount).ok_or_else(|| {
            Error::InvalidData(format!("line {}: invalid amount '{}'", line, row.amount))
        })?;

        transactions.push(Transaction {
            id: first_id + index as i64,
            amount,
            category: row
                .category
                .as_deref()
                .map(Category::parse_lenient)
                .unwrap_or(Category::Other),
            description: row.description.filter(|d| !d.is_empty()),
            occurred_at,
            recurring: row.recurring.as_deref().is_some_and(parse_flag),
        });
    }

    Ok(transactions)
}

fn parse_csv_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_csv_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite())
        .map(f64::abs)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}
