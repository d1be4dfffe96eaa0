//! Report command implementations

use std::fmt::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use ledgerwise_core::insights::build_prompt;
use ledgerwise_core::{Config, Error, MonthWindow, MonthlyReport, MonthlyStats, ReportSource};
use rust_decimal::{Decimal, RoundingStrategy};

use super::build_pipeline;

const UNAUTHORIZED_HINT: &str = "Unauthorized: pass --user or set LEDGERWISE_USER";

pub async fn cmd_report(
    config: &Config,
    file: &Path,
    user: Option<&str>,
    as_of: NaiveDate,
    local: bool,
    json: bool,
) -> Result<()> {
    let pipeline = build_pipeline(config, file, local);

    let report = match pipeline.run(user, as_of).await {
        Ok(report) => report,
        Err(Error::Unauthorized) => bail!(UNAUTHORIZED_HINT),
        Err(e) => return Err(e).context("Failed to build monthly report"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, &config.currency_symbol, file));
    }

    Ok(())
}

pub fn cmd_stats(
    config: &Config,
    file: &Path,
    user: Option<&str>,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    let (period, stats) = load_stats(config, file, user, as_of)?;

    if json {
        let output = serde_json::json!({ "period": period, "stats": stats });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let mut out = String::new();
        write_summary(&mut out, &period, &stats, &config.currency_symbol);
        print!("{}", out);
    }

    Ok(())
}

pub fn cmd_prompt(config: &Config, file: &Path, user: Option<&str>, as_of: NaiveDate) -> Result<()> {
    let (period, stats) = load_stats(config, file, user, as_of)?;
    println!(
        "{}",
        build_prompt(&stats, &period.month_name(), &config.currency_symbol)
    );
    Ok(())
}

fn load_stats(
    config: &Config,
    file: &Path,
    user: Option<&str>,
    as_of: NaiveDate,
) -> Result<(MonthWindow, MonthlyStats)> {
    let pipeline = build_pipeline(config, file, true);
    match pipeline.stats(user, as_of) {
        Ok(result) => Ok(result),
        Err(Error::Unauthorized) => bail!(UNAUTHORIZED_HINT),
        Err(e) => Err(e).with_context(|| format!("Failed to read ledger {}", file.display())),
    }
}

/// Render a report for the terminal
pub fn render_report(report: &MonthlyReport, symbol: &str, file: &Path) -> String {
    let mut out = String::new();

    if report.source == ReportSource::Demo {
        let _ = writeln!(out);
        let _ = writeln!(out, "⚠️  Your ledger could not be read. Showing demo data.");
    }

    write_summary(&mut out, &report.period, &report.stats, symbol);

    let _ = writeln!(out);
    let _ = writeln!(out, "💡 Insights");
    match report.source {
        ReportSource::Fallback => {
            let _ = writeln!(out, "   (AI insights unavailable, showing general tips)");
        }
        ReportSource::Remote => {
            let _ = writeln!(out, "   (AI-generated)");
        }
        ReportSource::Local | ReportSource::Demo => {}
    }
    for (i, insight) in report.insights.iter().enumerate() {
        let _ = writeln!(out, "   {}. {}", i + 1, insight);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "   Dashboard:    ledgerwise stats --month {}",
        report.period.start.format("%Y-%m")
    );
    let _ = writeln!(out, "   Transactions: {}", file.display());

    out
}

fn write_summary(out: &mut String, period: &MonthWindow, stats: &MonthlyStats, symbol: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "📊 Monthly Report: {}", period.label());
    let _ = writeln!(
        out,
        "   ─────────────────────────────────────────────"
    );
    let _ = writeln!(out, "   Income:        {}", money(symbol, stats.total_income));
    let _ = writeln!(out, "   Expenses:      {}", money(symbol, stats.total_expenses));
    let _ = writeln!(out, "   Net:           {}", money(symbol, stats.net_income()));
    let _ = writeln!(out, "   Transactions:  {}", stats.transaction_count);

    if stats.by_category.is_empty() {
        return;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "   Spending by category");
    for (category, amount) in stats.by_category.iter() {
        let share = share_of(amount, stats.total_expenses)
            .map(|s| format!("{:>4}%", s.to_string()))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "   {:<18} {:>12} {}",
            category,
            money(symbol, amount),
            share
        );
    }
}

fn money(symbol: &str, amount: Decimal) -> String {
    format!("{}{}", symbol, amount.normalize())
}

/// Whole-percent share of `total`, if it can be computed
fn share_of(amount: Decimal, total: Decimal) -> Option<Decimal> {
    if total <= Decimal::ZERO {
        return None;
    }
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(total)
        .map(|s| s.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}
