//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Load configuration with environment overrides
//! - `resolve_month` - Turn a `--month` value into a date inside that month
//! - `build_pipeline` - Wire the ledger file and insight generator together

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use ledgerwise_core::{
    AIClient, Config, CsvFileLedger, InsightGenerator, ReportPipeline, TextGenerator,
};
use tracing::debug;

/// Load config from `path`, the user config directory, or built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = Config::load(path).context("Failed to load configuration")?;
    debug!(
        backend = %config.ai.backend,
        currency = %config.currency_symbol,
        "Loaded configuration"
    );
    Ok(config)
}

/// Resolve `YYYY-MM` to the first day of that month, or today if not given
pub fn resolve_month(month: Option<&str>) -> Result<NaiveDate> {
    match month {
        Some(m) => NaiveDate::parse_from_str(&format!("{}-01", m.trim()), "%Y-%m-%d")
            .with_context(|| format!("Invalid --month '{}' (use YYYY-MM)", m)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Build the report pipeline for a ledger file.
///
/// With `local_only`, no text-generation client is created even if one is
/// configured.
pub fn build_pipeline(
    config: &Config,
    file: &Path,
    local_only: bool,
) -> ReportPipeline<CsvFileLedger> {
    let client = if local_only {
        None
    } else {
        AIClient::from_config(&config.ai)
    };

    match client {
        Some(ref c) => debug!(backend = c.backend_name(), model = c.model(), "Using remote insights"),
        None => debug!("Using local insights"),
    }

    let generator = InsightGenerator::new(client).with_currency_symbol(config.currency_symbol.as_str());
    ReportPipeline::new(CsvFileLedger::new(file), generator)
}
