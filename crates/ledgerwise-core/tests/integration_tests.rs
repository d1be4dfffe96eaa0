//! Integration tests for ledgerwise-core
//!
//! These tests exercise the full CSV ledger → aggregate → insights workflow.

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use ledgerwise_core::{
    generate, AIClient, BackendKind, Config, CsvLedger, Error, InsightGenerator, LedgerSource,
    MockBackend, ReportPipeline, ReportSource, DEFAULT_INSIGHTS,
};

/// October 2026 for two users, plus rows outside the month
fn ledger_csv() -> &'static str {
    r#"date,type,amount,category,user
2026-09-28,expense,500,housing,priya
2026-10-01,income,25000,,priya
2026-10-01,expense,6500,housing,priya
2026-10-03,expense,1600,groceries,priya
2026-10-05,expense,2000,transportation,priya
2026-10-08,expense,1800,entertainment,priya
2026-10-10,expense,3000,utilities,priya
2026-10-17,expense,1600,groceries,priya
2026-10-21,expense,2000,dining,priya
2026-10-12,expense,999,dining,sam
2026-11-01,income,25000,,priya"#
}

fn write_ledger(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write ledger");
    file
}

fn october() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_local_report_from_csv() {
    let file = write_ledger(ledger_csv());
    let ledger = CsvLedger::from_path(file.path()).expect("Failed to load ledger");
    let pipeline = ReportPipeline::new(ledger, InsightGenerator::local());

    let report = pipeline.run(Some("priya"), october()).await.unwrap();

    assert_eq!(report.source, ReportSource::Local);
    assert_eq!(report.stats.transaction_count, 8);
    assert_eq!(report.stats.total_income, Decimal::from(25000));
    assert_eq!(report.stats.total_expenses, Decimal::from(18500));
    assert_eq!(report.stats.by_category.get("groceries"), Some(Decimal::from(3200)));

    let categories: Vec<&str> = report.stats.by_category.iter().map(|(c, _)| c).collect();
    assert_eq!(
        categories,
        vec!["housing", "groceries", "transportation", "entertainment", "utilities", "dining"]
    );

    assert_eq!(report.insights.len(), 5);
    assert!(report.insights[0].contains("26%"));
    assert!(report.insights[1].contains("35%"));
    assert!(report.insights[3].contains("highest spending category is housing at 35%"));
}

#[tokio::test]
async fn test_remote_report_with_mock_backend() {
    let file = write_ledger(ledger_csv());
    let ledger = CsvLedger::from_path(file.path()).unwrap();
    let mock = MockBackend::new();
    let generator = InsightGenerator::new(Some(AIClient::Mock(mock.clone())));
    let pipeline = ReportPipeline::new(ledger, generator);

    let report = pipeline.run(Some("priya"), october()).await.unwrap();

    assert_eq!(report.source, ReportSource::Remote);
    assert_eq!(report.insights.len(), 5);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_remote_failure_falls_back_to_defaults() {
    let ledger = CsvLedger::from_reader(ledger_csv().as_bytes()).unwrap();
    let generator = InsightGenerator::new(Some(AIClient::Mock(MockBackend::failing())));
    let pipeline = ReportPipeline::new(ledger, generator);

    let report = pipeline.run(Some("priya"), october()).await.unwrap();

    assert_eq!(report.source, ReportSource::Fallback);
    assert_eq!(report.insights, DEFAULT_INSIGHTS.to_vec());
    // Stats are still real even when insights degrade
    assert_eq!(report.stats.total_expenses, Decimal::from(18500));
}

#[tokio::test]
async fn test_empty_month_report() {
    let ledger = CsvLedger::from_reader(ledger_csv().as_bytes()).unwrap();
    let pipeline = ReportPipeline::new(ledger, InsightGenerator::local());

    let march = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let report = pipeline.run(Some("priya"), march).await.unwrap();

    assert_eq!(report.stats.transaction_count, 0);
    assert!(report.stats.by_category.is_empty());
    assert_eq!(report.insights.len(), 2);
}

#[tokio::test]
async fn test_uncategorized_expense_shows_demo_report() {
    let csv = "date,type,amount,category\n2026-10-02,expense,40,\n";
    let ledger = CsvLedger::from_reader(csv.as_bytes()).unwrap();
    let pipeline = ReportPipeline::new(ledger, InsightGenerator::local());

    let report = pipeline.run(Some("priya"), october()).await.unwrap();

    assert_eq!(report.source, ReportSource::Demo);
    assert_eq!(report.stats.total_income, Decimal::from(25000));
    assert!(report.insights[0].starts_with("Your housing expenses are 35%"));
}

#[tokio::test]
async fn test_report_requires_identity() {
    let ledger = CsvLedger::from_reader(ledger_csv().as_bytes()).unwrap();
    let pipeline = ReportPipeline::new(ledger, InsightGenerator::local());

    let result = pipeline.run(None, october()).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
}

#[test]
fn test_ledger_is_scoped_per_user() {
    let ledger = CsvLedger::from_reader(ledger_csv().as_bytes()).unwrap();
    let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2026, 10, 31).unwrap();

    let sam = ledger.transactions_between("sam", start, end).unwrap();
    assert_eq!(sam.len(), 1);
    assert_eq!(sam[0].category.as_deref(), Some("dining"));
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let ledger = CsvLedger::from_reader(ledger_csv().as_bytes()).unwrap();
    let pipeline = ReportPipeline::new(ledger, InsightGenerator::local());
    let report = pipeline.run(Some("priya"), october()).await.unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["source"], "local");
    assert_eq!(json["period"]["start"], "2026-10-01");
    assert_eq!(json["stats"]["transaction_count"], 8);
    assert_eq!(json["stats"]["by_category"]["housing"], "6500");
    assert_eq!(json["insights"].as_array().unwrap().len(), 5);
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[tokio::test]
async fn test_config_file_selects_mock_backend() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"currency_symbol = "$"

[ai]
backend = "mock"
"#
    )
    .unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.currency_symbol, "$");
    assert_eq!(config.ai.backend, BackendKind::Mock);

    let client = AIClient::from_config(&config.ai).expect("mock backend is always available");
    let stats = ledgerwise_core::aggregate(&[]).unwrap();
    let insights = generate(&stats, Some(&client)).await;
    assert_eq!(insights.len(), 5);
}

#[test]
fn test_missing_config_path_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}
