//! Ledger sources: where a user's transactions come from
//!
//! The engine never filters by date or user itself. A `LedgerSource` answers
//! "this user's transactions between these two dates" and the aggregator
//! trusts the answer.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionType};

/// Query boundary to the transaction store
pub trait LedgerSource: Send + Sync {
    /// Transactions owned by `user` with `start <= date <= end`
    fn transactions_between(
        &self,
        user: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>>;
}

/// A transaction plus the user it belongs to (`None` = visible to everyone)
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub user: Option<String>,
    pub transaction: Transaction,
}

/// In-memory ledger loaded from CSV
///
/// Format: `date,type,amount,category[,user]`
/// - `date` is `YYYY-MM-DD`
/// - `type` is `income` or `expense` (any case)
/// - `category` may be empty for income
/// - rows with an empty or missing `user` are visible to every user
#[derive(Debug, Clone, Default)]
pub struct CsvLedger {
    entries: Vec<LedgerEntry>,
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    kind: usize,
    amount: usize,
    category: Option<usize>,
    user: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Validation(format!("Missing '{}' column", name)))
        };

        Ok(Self {
            date: require("date")?,
            kind: require("type")?,
            amount: require("amount")?,
            category: find("category"),
            user: find("user"),
        })
    }
}

impl CsvLedger {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    /// Load a ledger from a CSV file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let ledger = Self::from_reader(file)?;
        debug!(path = %path.display(), entries = ledger.len(), "Loaded CSV ledger");
        Ok(ledger)
    }

    /// Parse CSV data with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns = Columns::from_headers(rdr.headers()?)?;
        let mut entries = Vec::new();

        for (index, result) in rdr.records().enumerate() {
            let record = result?;
            // Header is line 1
            let line = index + 2;
            entries.push(parse_entry(&record, &columns, line)?);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LedgerSource for CsvLedger {
    fn transactions_between(
        &self,
        user: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let transactions: Vec<Transaction> = self
            .entries
            .iter()
            .filter(|e| e.user.as_deref().map_or(true, |owner| owner == user))
            .filter(|e| start <= e.transaction.date && e.transaction.date <= end)
            .map(|e| e.transaction.clone())
            .collect();

        debug!(
            user,
            %start,
            %end,
            count = transactions.len(),
            "Selected ledger transactions"
        );
        Ok(transactions)
    }
}

/// CSV ledger file that is read on every query
///
/// An unreadable or malformed file surfaces as a query error, which the
/// report pipeline answers with the demonstration report.
#[derive(Debug, Clone)]
pub struct CsvFileLedger {
    path: PathBuf,
}

impl CsvFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerSource for CsvFileLedger {
    fn transactions_between(
        &self,
        user: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        CsvLedger::from_path(&self.path)?.transactions_between(user, start, end)
    }
}

fn parse_entry(record: &StringRecord, columns: &Columns, line: usize) -> Result<LedgerEntry> {
    let field = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
    let optional = |idx: Option<usize>| {
        idx.map(field)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let date = NaiveDate::parse_from_str(field(columns.date), "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!(
            "line {}: unable to parse date '{}'",
            line,
            field(columns.date)
        ))
    })?;

    let kind = TransactionType::from_str(field(columns.kind))
        .map_err(|e| Error::Validation(format!("line {}: {}", line, e)))?;

    let amount = Decimal::from_str(field(columns.amount)).map_err(|_| {
        Error::Validation(format!(
            "line {}: unable to parse amount '{}'",
            line,
            field(columns.amount)
        ))
    })?;

    Ok(LedgerEntry {
        user: optional(columns.user),
        transaction: Transaction {
            amount,
            kind,
            category: optional(columns.category),
            date,
        },
    })
}
