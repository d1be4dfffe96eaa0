//! Data models for Ledgerwise

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

/// Direction of a ledger entry. The amount itself is always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// A single ledger entry as returned by the ledger source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Required for expenses, ignored for income
    pub category: Option<String>,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn expense(amount: Decimal, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount,
            kind: TransactionType::Expense,
            category: Some(category.into()),
            date,
        }
    }

    pub fn income(amount: Decimal, date: NaiveDate) -> Self {
        Self {
            amount,
            kind: TransactionType::Income,
            category: None,
            date,
        }
    }
}

/// Per-category expense totals.
///
/// Iterates in first-insertion order: a category's position is fixed by the
/// first transaction that mentioned it. Prompt text and the highest-category
/// tie-break both depend on this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown(Vec<(String, Decimal)>);

impl CategoryBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `category`, creating the entry at zero if absent.
    /// Fails if the category total would overflow.
    pub fn add(&mut self, category: &str, amount: Decimal) -> crate::error::Result<()> {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => {
                *total = total.checked_add(amount).ok_or_else(|| {
                    Error::Validation(format!("total for category '{}' overflows", category))
                })?;
            }
            None => self.0.push((category.to_string(), amount)),
        }
        Ok(())
    }

    /// Set the total for `category`, keeping its position if already present
    pub fn set(&mut self, category: &str, total: Decimal) {
        match self.0.iter_mut().find(|(name, _)| name == category) {
            Some((_, existing)) => *existing = total,
            None => self.0.push((category.to_string(), total)),
        }
    }

    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Sum of all category totals
    pub fn total(&self) -> crate::error::Result<Decimal> {
        self.0
            .iter()
            .try_fold(Decimal::ZERO, |sum, (_, total)| sum.checked_add(*total))
            .ok_or_else(|| Error::Validation("category totals overflow".into()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collects already-summed totals. A repeated category keeps its first
/// position and takes the last total.
impl<S: AsRef<str>> FromIterator<(S, Decimal)> for CategoryBreakdown {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for (category, total) in iter {
            breakdown.set(category.as_ref(), total);
        }
        breakdown
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, total) in &self.0 {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

/// Aggregated totals for one reporting period
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub by_category: CategoryBreakdown,
    pub transaction_count: usize,
}

impl MonthlyStats {
    pub fn net_income(&self) -> Decimal {
        self.total_income - self.total_expenses
    }
}

/// Inclusive date range covering one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// The month that contains `date`, from the 1st to the last day
    pub fn containing(date: NaiveDate) -> Self {
        let start = date - Days::new(u64::from(date.day0()));
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Full month name, e.g. "October"
    pub fn month_name(&self) -> String {
        self.start.format("%B").to_string()
    }

    /// Display label, e.g. "October 2026"
    pub fn label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }
}

/// Which path produced a report's insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Rule-based insights computed locally
    Local,
    /// Insights returned by the text-generation provider
    Remote,
    /// Provider failed; the fixed default list was used
    Fallback,
    /// Ledger was unavailable; the demonstration report was used
    Demo,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::Local => "local",
            ReportSource::Remote => "remote",
            ReportSource::Fallback => "fallback",
            ReportSource::Demo => "demo",
        }
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A complete monthly report ready for display
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub period: MonthWindow,
    pub stats: MonthlyStats,
    pub insights: Vec<String>,
    pub source: ReportSource,
}
