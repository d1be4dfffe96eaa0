//! Monthly report pipeline
//!
//! identity check -> month window -> ledger query -> aggregate -> insights
//!
//! A failing ledger (or data the aggregator rejects) does not fail the report:
//! the static demonstration report is returned instead.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::insights::InsightGenerator;
use crate::ledger::LedgerSource;
use crate::models::{MonthWindow, MonthlyReport, MonthlyStats, ReportSource};
use crate::stats::aggregate;

const DEMO_CATEGORIES: [(&str, i64); 6] = [
    ("housing", 6500),
    ("groceries", 3200),
    ("transportation", 2000),
    ("entertainment", 1800),
    ("utilities", 3000),
    ("dining", 2000),
];

const DEMO_INSIGHTS: [&str; 5] = [
    "Your housing expenses are 35% of your total spending - aim to keep housing costs under 30% of your income.",
    "Consider setting up automatic transfers to a savings account for better financial management.",
    "Your entertainment spending is well-balanced relative to your overall budget.",
    "Track your recurring subscriptions - you may find services you no longer use.",
    "Setting aside 10-15% of your income for long-term savings will help build financial security.",
];

/// Builds monthly reports for a caller
pub struct ReportPipeline<L> {
    ledger: L,
    generator: InsightGenerator,
}

impl<L: LedgerSource> ReportPipeline<L> {
    pub fn new(ledger: L, generator: InsightGenerator) -> Self {
        Self { ledger, generator }
    }

    pub fn generator(&self) -> &InsightGenerator {
        &self.generator
    }

    /// Month totals for `user`, without generating insights
    pub fn stats(&self, user: Option<&str>, as_of: NaiveDate) -> Result<(MonthWindow, MonthlyStats)> {
        let user = require_user(user)?;
        let period = MonthWindow::containing(as_of);
        let transactions = self
            .ledger
            .transactions_between(user, period.start, period.end)?;
        Ok((period, aggregate(&transactions)?))
    }

    /// Build the report for the month containing `as_of`.
    ///
    /// Fails only with `Error::Unauthorized` when no caller identity is given.
    pub async fn run(&self, user: Option<&str>, as_of: NaiveDate) -> Result<MonthlyReport> {
        let (period, stats) = match self.stats(user, as_of) {
            Ok(result) => result,
            Err(Error::Unauthorized) => return Err(Error::Unauthorized),
            Err(e) => {
                error!(error = %e, "Failed to load monthly stats, showing demo report");
                return Ok(demo_report(MonthWindow::containing(as_of)));
            }
        };

        let generator = self.generator.clone().with_month(&period);
        let (insights, source) = generator.generate_with_source(&stats).await;

        info!(
            period = %period.label(),
            transactions = stats.transaction_count,
            insights = insights.len(),
            source = %source,
            "Generated monthly report"
        );

        Ok(MonthlyReport {
            period,
            stats,
            insights,
            source,
        })
    }
}

fn require_user(user: Option<&str>) -> Result<&str> {
    user.map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(Error::Unauthorized)
}

/// Sample month shown when the ledger is unavailable
pub fn demo_stats() -> MonthlyStats {
    let by_category = DEMO_CATEGORIES
        .iter()
        .map(|(name, amount)| (*name, Decimal::from(*amount)))
        .collect();

    MonthlyStats {
        total_expenses: Decimal::from(18500),
        total_income: Decimal::from(25000),
        by_category,
        transaction_count: 15,
    }
}

/// The demonstration report for `period`
pub fn demo_report(period: MonthWindow) -> MonthlyReport {
    MonthlyReport {
        period,
        stats: demo_stats(),
        insights: DEMO_INSIGHTS.iter().map(|s| s.to_string()).collect(),
        source: ReportSource::Demo,
    }
}
