//! Monthly statistics aggregation
//!
//! Reduces a period's transactions into totals and a per-category expense
//! breakdown. Input is expected to be pre-filtered to the reporting period.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{MonthlyStats, Transaction, TransactionType};

/// Aggregate a period's transactions into `MonthlyStats`.
///
/// Fails without producing partial results if an amount is negative or an
/// expense has no category.
pub fn aggregate(transactions: &[Transaction]) -> Result<MonthlyStats> {
    let mut stats = MonthlyStats {
        transaction_count: transactions.len(),
        ..MonthlyStats::default()
    };

    for (index, tx) in transactions.iter().enumerate() {
        if tx.amount < Decimal::ZERO {
            return Err(Error::Validation(format!(
                "transaction {} on {} has negative amount {}",
                index, tx.date, tx.amount
            )));
        }

        match tx.kind {
            TransactionType::Expense => {
                let category = tx
                    .category
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        Error::Validation(format!(
                            "expense {} on {} is missing a category",
                            index, tx.date
                        ))
                    })?;
                stats.total_expenses = accumulate(stats.total_expenses, tx, index)?;
                stats.by_category.add(category, tx.amount)?;
            }
            TransactionType::Income => {
                stats.total_income = accumulate(stats.total_income, tx, index)?;
            }
        }
    }

    debug!(
        transactions = stats.transaction_count,
        categories = stats.by_category.len(),
        "Aggregated monthly stats"
    );

    Ok(stats)
}

fn accumulate(total: Decimal, tx: &Transaction, index: usize) -> Result<Decimal> {
    total.checked_add(tx.amount).ok_or_else(|| {
        Error::Validation(format!(
            "transaction {} on {} overflows the {} total",
            index,
            tx.date,
            tx.kind.as_str().to_lowercase()
        ))
    })
}
