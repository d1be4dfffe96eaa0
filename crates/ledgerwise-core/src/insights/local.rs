//! Rule-based insights computed without any network access

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::MonthlyStats;

use super::generator::InsightStrategy;

/// Savings rate (percent of income) below which the cautionary insight is used
const SAVINGS_RATE_TARGET: u32 = 20;
/// Housing share (percent of expenses) above which housing gets called out
const HOUSING_SHARE_LIMIT: u32 = 30;
const HOUSING_CATEGORY: &str = "housing";

const LOW_SAVINGS: &str = "Your savings rate is below 20%. Consider exploring ways to increase your income or reduce non-essential expenses.";
const SUBSCRIPTIONS: &str = "Track your recurring subscriptions - you may find services you no longer use that could be canceled.";
const EMERGENCY_FUND: &str = "Setting aside money for an emergency fund covering 3-6 months of expenses provides important financial security.";

/// Deterministic insights derived from the savings rate and category shares
///
/// Produces, in order:
/// 1. a savings-rate observation (when there is income)
/// 2. a housing warning (when housing exceeds 30% of expenses)
/// 3. the recurring subscriptions reminder
/// 4. the highest spending category (when there are expenses)
/// 5. the emergency fund reminder
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalInsightStrategy;

impl LocalInsightStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Compute the insight list synchronously
    pub fn evaluate(&self, stats: &MonthlyStats) -> Result<Vec<String>> {
        let mut insights = Vec::with_capacity(5);

        if stats.total_income > Decimal::ZERO {
            let rate = percent_of(stats.net_income(), stats.total_income)?;
            if rate < Decimal::from(SAVINGS_RATE_TARGET) {
                insights.push(LOW_SAVINGS.to_string());
            } else {
                insights.push(format!(
                    "Great job saving {}% of your income this month! Financial experts recommend saving 15-20% of your income.",
                    display_percent(rate)
                ));
            }
        }

        let shares = category_shares(stats)?;

        if let Some((_, share)) = shares.iter().find(|(name, _)| *name == HOUSING_CATEGORY) {
            if *share > Decimal::from(HOUSING_SHARE_LIMIT) {
                insights.push(format!(
                    "Housing expenses are {}% of your spending. Financial advisors suggest keeping housing costs under 30% of your budget.",
                    display_percent(*share)
                ));
            }
        }

        insights.push(SUBSCRIPTIONS.to_string());

        if let Some((category, share)) = highest_share(&shares) {
            insights.push(format!(
                "Your highest spending category is {} at {}% of your expenses. Consider if there are ways to optimize this area.",
                category,
                display_percent(share)
            ));
        }

        insights.push(EMERGENCY_FUND.to_string());

        debug!(count = insights.len(), "Generated local insights");
        Ok(insights)
    }
}

#[async_trait]
impl InsightStrategy for LocalInsightStrategy {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn insights(&self, stats: &MonthlyStats) -> Result<Vec<String>> {
        self.evaluate(stats)
    }
}

/// `part / whole * 100` with overflow reported as an error
fn percent_of(part: Decimal, whole: Decimal) -> Result<Decimal> {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .ok_or_else(|| Error::Validation(format!("cannot compute {} as a percent of {}", part, whole)))
}

/// Each category's share of total expenses, in breakdown order.
/// Empty when there are no expenses.
fn category_shares(stats: &MonthlyStats) -> Result<Vec<(&str, Decimal)>> {
    if stats.total_expenses <= Decimal::ZERO {
        return Ok(Vec::new());
    }
    stats
        .by_category
        .iter()
        .map(|(name, amount)| Ok((name, percent_of(amount, stats.total_expenses)?)))
        .collect()
}

/// Largest share; ties go to the category seen first
fn highest_share<'a>(shares: &[(&'a str, Decimal)]) -> Option<(&'a str, Decimal)> {
    shares.iter().fold(None, |best, &(name, share)| match best {
        Some((_, top)) if share <= top => best,
        _ => Some((name, share)),
    })
}

/// Round half away from zero to a whole percent
fn display_percent(value: Decimal) -> String {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryBreakdown;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn stats(income: &str, categories: &[(&str, &str)]) -> MonthlyStats {
        let by_category: CategoryBreakdown =
            categories.iter().map(|(name, amount)| (*name, dec(amount))).collect();
        MonthlyStats {
            total_expenses: by_category.total().unwrap(),
            total_income: dec(income),
            transaction_count: categories.len(),
            by_category,
        }
    }

    fn sample_month() -> MonthlyStats {
        stats(
            "25000",
            &[
                ("housing", "6500"),
                ("groceries", "3200"),
                ("transportation", "2000"),
                ("entertainment", "1800"),
                ("utilities", "3000"),
                ("dining", "2000"),
            ],
        )
    }

    #[test]
    fn test_sample_month_produces_five_insights() {
        let insights = LocalInsightStrategy::new().evaluate(&sample_month()).unwrap();

        assert_eq!(insights.len(), 5);
        assert_eq!(
            insights[0],
            "Great job saving 26% of your income this month! Financial experts recommend saving 15-20% of your income."
        );
        assert_eq!(
            insights[1],
            "Housing expenses are 35% of your spending. Financial advisors suggest keeping housing costs under 30% of your budget."
        );
        assert_eq!(insights[2], SUBSCRIPTIONS);
        assert_eq!(
            insights[3],
            "Your highest spending category is housing at 35% of your expenses. Consider if there are ways to optimize this area."
        );
        assert_eq!(insights[4], EMERGENCY_FUND);
    }

    #[test]
    fn test_no_income_single_category() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("0", &[("dining", "1000")]))
            .unwrap();

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0], SUBSCRIPTIONS);
        assert_eq!(
            insights[1],
            "Your highest spending category is dining at 100% of your expenses. Consider if there are ways to optimize this area."
        );
        assert_eq!(insights[2], EMERGENCY_FUND);
    }

    #[test]
    fn test_low_savings_rate() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("1000", &[("groceries", "900")]))
            .unwrap();
        assert_eq!(insights[0], LOW_SAVINGS);
    }

    #[test]
    fn test_savings_rate_exactly_twenty_is_congratulated() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("1000", &[("groceries", "800")]))
            .unwrap();
        assert!(insights[0].starts_with("Great job saving 20%"));
    }

    #[test]
    fn test_overspending_is_low_savings() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("100", &[("rent", "500")]))
            .unwrap();
        assert_eq!(insights[0], LOW_SAVINGS);
    }

    #[test]
    fn test_housing_at_limit_is_not_flagged() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("0", &[("housing", "30"), ("food", "70")]))
            .unwrap();
        assert!(!insights.iter().any(|i| i.starts_with("Housing expenses")));
        assert!(insights.iter().any(|i| i.contains("category is food at 70%")));
    }

    #[test]
    fn test_housing_match_is_exact() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("0", &[("Housing", "90"), ("food", "10")]))
            .unwrap();
        assert!(!insights.iter().any(|i| i.starts_with("Housing expenses")));
    }

    #[test]
    fn test_tie_goes_to_first_category() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("0", &[("travel", "50"), ("gifts", "50")]))
            .unwrap();
        assert!(insights[1].contains("category is travel at 50%"));
    }

    #[test]
    fn test_empty_month() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&MonthlyStats::default())
            .unwrap();
        assert_eq!(insights, vec![SUBSCRIPTIONS, EMERGENCY_FUND]);
    }

    #[test]
    fn test_income_only_month() {
        let insights = LocalInsightStrategy::new()
            .evaluate(&stats("5000", &[]))
            .unwrap();
        assert_eq!(insights.len(), 3);
        assert!(insights[0].starts_with("Great job saving 100%"));
    }

    #[test]
    fn test_display_percent_rounds_half_away_from_zero() {
        assert_eq!(display_percent(dec("12.5")), "13");
        assert_eq!(display_percent(dec("12.49")), "12");
        assert_eq!(display_percent(dec("35.135135")), "35");
        assert_eq!(display_percent(dec("100.000")), "100");
    }

    #[test]
    fn test_deterministic() {
        let strategy = LocalInsightStrategy::new();
        let first = strategy.evaluate(&sample_month()).unwrap();
        let second = strategy.evaluate(&sample_month()).unwrap();
        assert_eq!(first, second);
    }
}
