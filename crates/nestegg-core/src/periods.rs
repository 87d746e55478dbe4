//! Time-window partitioner
//!
//! Calendar-aligned reporting windows and the groupings the insight rules
//! look at (weekday vs weekend, day of month).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Reporting granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Noun used in messages ("compared to last month")
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Weekly => "week",
            Self::Monthly => "month",
            Self::Quarterly => "quarter",
            Self::Yearly => "year",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "yearly" | "year" => Ok(Self::Yearly),
            _ => Err(format!(
                "Unknown period: {}. Available: weekly, monthly, quarterly, yearly",
                s
            )),
        }
    }
}

/// First day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(&self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "sunday" | "sun" => Ok(Self::Sunday),
            _ => Err(format!("Unknown week start: {}", s)),
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Window of `granularity` containing `today`
pub fn current_window(granularity: Granularity, today: NaiveDate, week_start: WeekStart) -> DateWindow {
    match granularity {
        Granularity::Weekly => {
            let offset = days_since_week_start(today, week_start);
            let start = today - Duration::days(offset);
            DateWindow {
                start,
                end: start + Duration::days(6),
            }
        }
        Granularity::Monthly => {
            let start = first_of_month(today.year(), today.month());
            DateWindow {
                start,
                end: last_of_month(today.year(), today.month()),
            }
        }
        Granularity::Quarterly => {
            let first_month = (today.month0() / 3) * 3 + 1;
            DateWindow {
                start: first_of_month(today.year(), first_month),
                end: last_of_month(today.year(), first_month + 2),
            }
        }
        Granularity::Yearly => DateWindow {
            start: first_of_month(today.year(), 1),
            end: last_of_month(today.year(), 12),
        },
    }
}

/// Window of the same granularity ending the day before the current one starts
pub fn previous_window(granularity: Granularity, today: NaiveDate, week_start: WeekStart) -> DateWindow {
    let current = current_window(granularity, today, week_start);
    let day_before = current.start.pred_opt().unwrap_or(current.start);
    current_window(granularity, day_before, week_start)
}

fn days_since_week_start(date: NaiveDate, week_start: WeekStart) -> i64 {
    let from_monday = date.weekday().num_days_from_monday() as i64;
    let start_from_monday = week_start.weekday().num_days_from_monday() as i64;
    (from_monday - start_from_monday).rem_euclid(7)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    first_of_month(next_year, next_month)
        .pred_opt()
        .unwrap_or(NaiveDate::MAX)
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    last_of_month(date.year(), date.month()).day()
}

/// Transactions split into the current and previous windows
#[derive(Debug, Clone)]
pub struct PeriodPartition<'a> {
    pub current_window: DateWindow,
    pub previous_window: DateWindow,
    pub current: Vec<&'a Transaction>,
    pub previous: Vec<&'a Transaction>,
}

pub fn partition<'a>(
    transactions: &'a [Transaction],
    current: DateWindow,
    previous: DateWindow,
) -> PeriodPartition<'a> {
    let mut result = PeriodPartition {
        current_window: current,
        previous_window: previous,
        current: Vec::new(),
        previous: Vec::new(),
    };

    for tx in transactions {
        let date = tx.date();
        if current.contains(date) {
            result.current.push(tx);
        } else if previous.contains(date) {
            result.previous.push(tx);
        }
    }

    result
}

/// Partition for `granularity` around `today`
pub fn partition_for<'a>(
    transactions: &'a [Transaction],
    granularity: Granularity,
    today: NaiveDate,
    week_start: WeekStart,
) -> PeriodPartition<'a> {
    partition(
        transactions,
        current_window(granularity, today, week_start),
        previous_window(granularity, today, week_start),
    )
}

/// Weekday vs weekend spending totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySplit {
    pub weekday_total: f64,
    pub weekend_total: f64,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn weekday_split(transactions: &[&Transaction]) -> WeekdaySplit {
    let mut split = WeekdaySplit::default();
    for tx in transactions {
        if is_weekend(tx.date()) {
            split.weekend_total += tx.amount;
        } else {
            split.weekday_total += tx.amount;
        }
    }
    split
}

/// Totals indexed by day of month (index 0 is day 1)
pub fn day_of_month_totals(transactions: &[&Transaction]) -> [f64; 31] {
    let mut totals = [0.0; 31];
    for tx in transactions {
        totals[tx.date().day0() as usize] += tx.amount;
    }
    totals
}

/// Spending on days 1–7 of the month
pub fn first_week_total(transactions: &[&Transaction]) -> f64 {
    day_of_month_totals(transactions)[..7].iter().sum()
}

/// One spending total per day of the window, in date order
pub fn daily_series(transactions: &[&Transaction], window: DateWindow) -> Vec<(NaiveDate, f64)> {
    let mut series: Vec<(NaiveDate, f64)> = window
        .start
        .iter_days()
        .take_while(|d| *d <= window.end)
        .map(|d| (d, 0.0))
        .collect();

    for tx in transactions {
        let date = tx.date();
        if window.contains(date) {
            let idx = (date - window.start).num_days() as usize;
            series[idx].1 += tx.amount;
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx_on(d: NaiveDate, amount: f64) -> Transaction {
        Transaction {
            id: 0,
            amount,
            category: Category::Food,
            description: None,
            occurred_at: Utc
                .with_ymd_and_hms(d.year(), d.month(), d.day(), 18, 30, 0)
                .unwrap(),
            recurring: false,
        }
    }

    #[test]
    fn test_weekly_window_monday_start() {
        // 2026-10-16 is a Friday
        let w = current_window(Granularity::Weekly, date(2026, 10, 16), WeekStart::Monday);
        assert_eq!(w.start, date(2026, 10, 12));
        assert_eq!(w.end, date(2026, 10, 18));
        assert_eq!(w.days(), 7);
    }

    #[test]
    fn test_weekly_window_sunday_start() {
        let w = current_window(Granularity::Weekly, date(2026, 10, 16), WeekStart::Sunday);
        assert_eq!(w.start, date(2026, 10, 11));
        assert_eq!(w.end, date(2026, 10, 17));
    }

    #[test]
    fn test_previous_week_ends_day_before() {
        let prev = previous_window(Granularity::Weekly, date(2026, 10, 16), WeekStart::Monday);
        assert_eq!(prev.end, date(2026, 10, 11));
        assert_eq!(prev.start, date(2026, 10, 5));
    }

    #[test]
    fn test_previous_month_is_calendar_month() {
        let prev = previous_window(Granularity::Monthly, date(2026, 3, 31), WeekStart::Monday);
        assert_eq!(prev.start, date(2026, 2, 1));
        assert_eq!(prev.end, date(2026, 2, 28));

        let prev = previous_window(Granularity::Monthly, date(2026, 1, 15), WeekStart::Monday);
        assert_eq!(prev.start, date(2025, 12, 1));
        assert_eq!(prev.end, date(2025, 12, 31));
    }

    #[test]
    fn test_quarter_windows() {
        let cur = current_window(Granularity::Quarterly, date(2026, 5, 20), WeekStart::Monday);
        assert_eq!(cur.start, date(2026, 4, 1));
        assert_eq!(cur.end, date(2026, 6, 30));

        let prev = previous_window(Granularity::Quarterly, date(2026, 2, 1), WeekStart::Monday);
        assert_eq!(prev.start, date(2025, 10, 1));
        assert_eq!(prev.end, date(2025, 12, 31));
    }

    #[test]
    fn test_year_windows() {
        let prev = previous_window(Granularity::Yearly, date(2026, 7, 4), WeekStart::Monday);
        assert_eq!(prev.start, date(2025, 1, 1));
        assert_eq!(prev.end, date(2025, 12, 31));
    }

    #[test]
    fn test_partition_is_inclusive() {
        let txs = vec![
            tx_on(date(2026, 3, 1), 10.0),
            tx_on(date(2026, 3, 31), 20.0),
            tx_on(date(2026, 2, 28), 5.0),
            tx_on(date(2026, 1, 31), 99.0),
        ];
        let part = partition_for(&txs, Granularity::Monthly, date(2026, 3, 15), WeekStart::Monday);
        assert_eq!(part.current.len(), 2);
        assert_eq!(part.previous.len(), 1);
        assert_eq!(part.previous[0].amount, 5.0);
    }

    #[test]
    fn test_weekday_split() {
        // 2026-10-17 Saturday, 2026-10-18 Sunday, 2026-10-19 Monday
        let txs = vec![
            tx_on(date(2026, 10, 17), 40.0),
            tx_on(date(2026, 10, 18), 10.0),
            tx_on(date(2026, 10, 19), 25.0),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let split = weekday_split(&refs);
        assert_eq!(split.weekend_total, 50.0);
        assert_eq!(split.weekday_total, 25.0);
    }

    #[test]
    fn test_first_week_total() {
        let txs = vec![
            tx_on(date(2026, 3, 1), 10.0),
            tx_on(date(2026, 3, 7), 15.0),
            tx_on(date(2026, 3, 8), 100.0),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        assert_eq!(first_week_total(&refs), 25.0);
        assert_eq!(day_of_month_totals(&refs)[7], 100.0);
    }

    #[test]
    fn test_daily_series_covers_window() {
        let window = DateWindow {
            start: date(2026, 2, 1),
            end: date(2026, 2, 28),
        };
        let txs = vec![tx_on(date(2026, 2, 3), 12.0), tx_on(date(2026, 2, 3), 3.0)];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let series = daily_series(&refs, window);
        assert_eq!(series.len(), 28);
        assert_eq!(series[2], (date(2026, 2, 3), 15.0));
    }

    #[test]
    fn test_days_in_month_leap_year() {
        assert_eq!(days_in_month(date(2028, 2, 10)), 29);
        assert_eq!(days_in_month(date(2026, 2, 10)), 28);
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert!("daily".parse::<Granularity>().is_err());
    }
}
