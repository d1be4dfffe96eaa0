//! Strategy selection and the degrade-to-default policy

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::ai::AIClient;
use crate::error::Result;
use crate::models::{MonthWindow, MonthlyStats, ReportSource};

use super::local::LocalInsightStrategy;
use super::remote::{RemoteInsightStrategy, DEFAULT_CURRENCY_SYMBOL};
use super::default_insights;

/// A way of turning monthly totals into insights
#[async_trait]
pub trait InsightStrategy: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Produce an ordered list of insights
    async fn insights(&self, stats: &MonthlyStats) -> Result<Vec<String>>;
}

/// Run `strategy`, replacing any error with the default insight list
pub async fn remote_or_default<S>(strategy: &S, stats: &MonthlyStats) -> (Vec<String>, ReportSource)
where
    S: InsightStrategy + ?Sized,
{
    match strategy.insights(stats).await {
        Ok(insights) => (insights, ReportSource::Remote),
        Err(e) => {
            warn!(
                strategy = strategy.name(),
                error = %e,
                "Insight generation failed, using default insights"
            );
            (default_insights(), ReportSource::Fallback)
        }
    }
}

/// Chooses between remote and local insights
///
/// A configured client selects the remote strategy; `None` selects the
/// local rules without attempting any call.
#[derive(Clone)]
pub struct InsightGenerator {
    client: Option<AIClient>,
    month: Option<String>,
    currency_symbol: String,
}

impl InsightGenerator {
    pub fn new(client: Option<AIClient>) -> Self {
        Self {
            client,
            month: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    /// Local rules only
    pub fn local() -> Self {
        Self::new(None)
    }

    /// Name the month of `window` in the remote prompt (defaults to the current month)
    pub fn with_month(mut self, window: &MonthWindow) -> Self {
        self.month = Some(window.month_name());
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn remote_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Option<&AIClient> {
        self.client.as_ref()
    }

    /// The remote strategy this generator would use, if a client is configured
    pub fn remote_strategy(&self) -> Option<RemoteInsightStrategy> {
        let client = self.client.clone()?;
        let mut strategy =
            RemoteInsightStrategy::new(client).with_currency_symbol(self.currency_symbol.as_str());
        if let Some(ref month) = self.month {
            strategy = strategy.with_month(month.as_str());
        }
        Some(strategy)
    }

    /// Generate insights. Never fails.
    pub async fn generate(&self, stats: &MonthlyStats) -> Vec<String> {
        self.generate_with_source(stats).await.0
    }

    /// Generate insights and report which path produced them
    pub async fn generate_with_source(&self, stats: &MonthlyStats) -> (Vec<String>, ReportSource) {
        if let Some(strategy) = self.remote_strategy() {
            return remote_or_default(&strategy, stats).await;
        }

        debug!("No text-generation client configured, using local insights");
        match LocalInsightStrategy::new().insights(stats).await {
            Ok(insights) => (insights, ReportSource::Local),
            Err(e) => {
                warn!(error = %e, "Local insight rules failed, using default insights");
                (default_insights(), ReportSource::Fallback)
            }
        }
    }
}

/// Generate insights for `stats`, remotely when `remote` is `Some`
pub async fn generate(stats: &MonthlyStats, remote: Option<&AIClient>) -> Vec<String> {
    InsightGenerator::new(remote.cloned()).generate(stats).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::config::AiConfig;
    use crate::insights::DEFAULT_INSIGHTS;
    use crate::models::CategoryBreakdown;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_stats() -> MonthlyStats {
        let by_category: CategoryBreakdown = vec![
            ("housing", dec("6500")),
            ("groceries", dec("3200")),
            ("transportation", dec("2000")),
            ("entertainment", dec("1800")),
            ("utilities", dec("3000")),
            ("dining", dec("2000")),
        ]
        .into_iter()
        .collect();
        MonthlyStats {
            total_expenses: dec("18500"),
            total_income: dec("25000"),
            by_category,
            transaction_count: 15,
        }
    }

    #[tokio::test]
    async fn test_no_client_uses_local_rules() {
        let client = AIClient::from_config(&AiConfig::default());
        assert!(client.is_none());
        let generator = InsightGenerator::new(client);
        assert!(!generator.remote_available());

        let (insights, source) = generator.generate_with_source(&sample_stats()).await;
        assert_eq!(source, ReportSource::Local);
        assert_eq!(insights.len(), 5);
        assert!(insights[0].contains("26%"));
        assert!(insights[1].contains("35%"));
        assert!(insights[3].contains("highest spending category is housing at 35%"));
    }

    #[tokio::test]
    async fn test_remote_success() {
        let mock = MockBackend::with_response(r#"["Cook at home", "Cancel the gym"]"#);
        let generator = InsightGenerator::new(Some(AIClient::Mock(mock.clone())));

        let (insights, source) = generator.generate_with_source(&sample_stats()).await;
        assert_eq!(source, ReportSource::Remote);
        assert_eq!(insights, vec!["Cook at home", "Cancel the gym"]);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_yields_default_list() {
        let mock = MockBackend::with_response(r#"["unterminated", "#);
        let generator = InsightGenerator::new(Some(AIClient::Mock(mock)));

        let (insights, source) = generator.generate_with_source(&sample_stats()).await;
        assert_eq!(source, ReportSource::Fallback);
        assert_eq!(insights, DEFAULT_INSIGHTS.to_vec());
    }

    #[tokio::test]
    async fn test_backend_failure_yields_default_list() {
        let client = AIClient::Mock(MockBackend::failing());
        let insights = generate(&sample_stats(), Some(&client)).await;
        assert_eq!(insights, DEFAULT_INSIGHTS.to_vec());
    }

    #[tokio::test]
    async fn test_object_reply_yields_default_list() {
        let client = AIClient::Mock(MockBackend::with_response(r#"{"insights": ["a"]}"#));
        let insights = generate(&sample_stats(), Some(&client)).await;
        assert_eq!(insights, DEFAULT_INSIGHTS.to_vec());
    }

    #[tokio::test]
    async fn test_generate_without_client_is_deterministic() {
        let stats = sample_stats();
        let first = generate(&stats, None).await;
        let second = generate(&stats, None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_remote_strategy_carries_month_and_symbol() {
        let window = MonthWindow::containing(chrono::NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
        let generator = InsightGenerator::new(Some(AIClient::mock()))
            .with_month(&window)
            .with_currency_symbol("$");

        let prompt = generator.remote_strategy().unwrap().prompt(&sample_stats());
        assert!(prompt.contains("Financial Data for March:"));
        assert!(prompt.contains("housing: $6500"));
        assert!(InsightGenerator::local().remote_strategy().is_none());
    }
}
