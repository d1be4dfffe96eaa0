//! Insights produced by an external text-generation backend

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use crate::ai::parsing::parse_insight_list;
use crate::ai::{AIClient, TextGenerator};
use crate::error::Result;
use crate::models::{MonthWindow, MonthlyStats};

use super::generator::InsightStrategy;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

const MONTHLY_INSIGHTS_PROMPT: &str = r#"Analyze this financial data and provide 5 concise, actionable insights.
Focus on spending patterns and practical advice.
Keep it friendly and conversational.

Financial Data for {{month}}:
- Total Income: {{symbol}}{{income}}
- Total Expenses: {{symbol}}{{expenses}}
- Net Income: {{symbol}}{{net}}
- Expense Categories: {{categories}}

Format the response as a JSON array of strings, like this:
["insight 1", "insight 2", "insight 3", "insight 4", "insight 5"]
"#;

/// Asks a text-generation backend for insights and parses the JSON reply
///
/// Errors are returned as-is; degrading to the default list is the caller's
/// job (see [`super::remote_or_default`]).
#[derive(Clone)]
pub struct RemoteInsightStrategy {
    client: AIClient,
    month: String,
    currency_symbol: String,
}

impl RemoteInsightStrategy {
    /// Create a strategy for the current calendar month
    pub fn new(client: AIClient) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            client,
            month: MonthWindow::containing(today).month_name(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    /// Month name used in the prompt, e.g. "October"
    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = month.into();
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn prompt(&self, stats: &MonthlyStats) -> String {
        build_prompt(stats, &self.month, &self.currency_symbol)
    }
}

#[async_trait]
impl InsightStrategy for RemoteInsightStrategy {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn insights(&self, stats: &MonthlyStats) -> Result<Vec<String>> {
        let prompt = self.prompt(stats);
        let response = self.client.generate_text(&prompt).await?;
        let insights = parse_insight_list(&response)?;

        debug!(
            backend = self.client.backend_name(),
            model = self.client.model(),
            count = insights.len(),
            "Generated remote insights"
        );
        Ok(insights)
    }
}

/// Render the monthly insights prompt.
///
/// Categories appear as `name: <symbol>amount` pairs joined by `", "`, in the
/// breakdown's iteration order.
pub fn build_prompt(stats: &MonthlyStats, month: &str, currency_symbol: &str) -> String {
    let categories = stats
        .by_category
        .iter()
        .map(|(name, amount)| format!("{}: {}{}", name, currency_symbol, amount_text(amount)))
        .collect::<Vec<_>>()
        .join(", ");

    render(
        MONTHLY_INSIGHTS_PROMPT,
        &[
            ("month", month.to_string()),
            ("symbol", currency_symbol.to_string()),
            ("income", amount_text(stats.total_income)),
            ("expenses", amount_text(stats.total_expenses)),
            ("net", amount_text(stats.net_income())),
            ("categories", categories),
        ],
    )
}

/// Mustache-style `{{var}}` substitution
fn render(template: &str, vars: &[(&str, String)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let pattern = format!("{{{{{}}}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

/// Amounts without trailing zeros, e.g. `6500.00` -> `6500`
fn amount_text(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::error::Error;
    use crate::models::CategoryBreakdown;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample_stats() -> MonthlyStats {
        let by_category: CategoryBreakdown = vec![
            ("housing", dec("6500.00")),
            ("groceries", dec("3200")),
            ("dining", dec("2000.50")),
        ]
        .into_iter()
        .collect();
        MonthlyStats {
            total_expenses: by_category.total().unwrap(),
            total_income: dec("25000"),
            by_category,
            transaction_count: 4,
        }
    }

    #[test]
    fn test_build_prompt_contents() {
        let prompt = build_prompt(&sample_stats(), "October", "₹");

        assert!(prompt.contains("Financial Data for October:"));
        assert!(prompt.contains("- Total Income: ₹25000"));
        assert!(prompt.contains("- Total Expenses: ₹11700.5"));
        assert!(prompt.contains("- Net Income: ₹13299.5"));
        assert!(prompt.contains(
            "- Expense Categories: housing: ₹6500, groceries: ₹3200, dining: ₹2000.5"
        ));
        assert!(prompt.contains("JSON array of strings"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_build_prompt_custom_symbol() {
        let prompt = build_prompt(&sample_stats(), "March", "$");
        assert!(prompt.contains("- Total Income: $25000"));
        assert!(prompt.contains("housing: $6500"));
    }

    #[test]
    fn test_build_prompt_negative_net() {
        let stats = MonthlyStats {
            total_income: dec("100"),
            total_expenses: dec("250"),
            ..MonthlyStats::default()
        };
        let prompt = build_prompt(&stats, "May", "₹");
        assert!(prompt.contains("- Net Income: ₹-150"));
        assert!(prompt.contains("- Expense Categories: \n"));
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let result = render("{{a}} and {{a}} but {{b}}", &[("a", "x".to_string())]);
        assert_eq!(result, "x and x but {{b}}");
    }

    #[tokio::test]
    async fn test_remote_strategy_parses_fenced_reply() {
        let mock = MockBackend::new();
        let strategy = RemoteInsightStrategy::new(AIClient::Mock(mock.clone())).with_month("June");

        let insights = strategy.insights(&sample_stats()).await.unwrap();
        assert_eq!(insights.len(), 5);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_remote_strategy_surfaces_parse_errors() {
        let mock = MockBackend::with_response("Sure! Here are some tips: save more.");
        let strategy = RemoteInsightStrategy::new(AIClient::Mock(mock));

        let err = strategy.insights(&sample_stats()).await.unwrap_err();
        assert!(matches!(err, Error::RemoteGeneration(_)));
    }
}
