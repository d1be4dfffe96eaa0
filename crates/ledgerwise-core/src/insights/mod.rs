//! Insight Engine - short, human-readable observations about a month
//!
//! Two strategies turn a `MonthlyStats` into an ordered list of insights:
//!
//! - **Remote** - asks a text-generation backend for five insights as a JSON
//!   array. Used only when a client is configured.
//! - **Local** - deterministic rules over the savings rate and category shares.
//!
//! Generation never fails outward. A remote error or unparseable reply
//! degrades to [`DEFAULT_INSIGHTS`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledgerwise_core::insights::InsightGenerator;
//!
//! let generator = InsightGenerator::new(AIClient::from_config(&config.ai))
//!     .with_month(&window)
//!     .with_currency_symbol(&config.currency_symbol);
//! let (insights, source) = generator.generate_with_source(&stats).await;
//! ```

pub mod generator;
pub mod local;
pub mod remote;

pub use generator::{generate, remote_or_default, InsightGenerator, InsightStrategy};
pub use local::LocalInsightStrategy;
pub use remote::{build_prompt, RemoteInsightStrategy};

/// Returned whenever remote generation fails for any reason
pub const DEFAULT_INSIGHTS: [&str; 5] = [
    "Your highest expense category might need attention.",
    "Consider setting up a budget for better financial management.",
    "Track your recurring expenses to identify potential savings.",
    "Save about 20% of your income each month for future goals.",
    "Try to increase your income sources for better financial stability.",
];

/// Owned copy of [`DEFAULT_INSIGHTS`]
pub fn default_insights() -> Vec<String> {
    DEFAULT_INSIGHTS.iter().map(|s| s.to_string()).collect()
}
