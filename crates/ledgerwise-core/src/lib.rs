//! Ledgerwise Core Library
//!
//! Monthly financial summaries and insights:
//! - Aggregation of a month's transactions into categorized totals
//! - Insight generation, remote (text-generation backend) or local rules
//! - Pluggable text-generation backends (Gemini, OpenAI-compatible, mock)
//! - CSV ledger source and the monthly report pipeline
//! - TOML configuration with environment overrides

pub mod ai;
pub mod config;
pub mod error;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod report;
pub mod stats;

/// Test utilities including a mock text-generation server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIClient, GeminiBackend, MockBackend, OpenAICompatibleBackend, TextGenerator};
pub use config::{AiConfig, BackendKind, Config};
pub use error::{Error, Result};
pub use insights::{
    default_insights, generate, InsightGenerator, InsightStrategy, LocalInsightStrategy,
    RemoteInsightStrategy, DEFAULT_INSIGHTS,
};
pub use ledger::{CsvFileLedger, CsvLedger, LedgerEntry, LedgerSource};
pub use models::{
    CategoryBreakdown, MonthWindow, MonthlyReport, MonthlyStats, ReportSource, Transaction,
    TransactionType,
};
pub use report::{demo_report, demo_stats, ReportPipeline};
pub use stats::aggregate;
