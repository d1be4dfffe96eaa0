//! Mock backend for testing
//!
//! Returns a canned response (or a canned failure) without any network I/O,
//! and counts how many times it was asked to generate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::TextGenerator;

const DEFAULT_RESPONSE: &str = r#"```json
[
  "Your biggest category is worth a closer look this month.",
  "Set a weekly cap for dining out and track it.",
  "Move part of your net income into savings on payday.",
  "Review subscriptions you have not used in the last 30 days.",
  "Keep building an emergency fund of 3-6 months of expenses."
]
```"#;

/// Mock text-generation backend
///
/// Clones share the call counter, so a test can hand a clone to the code
/// under test and inspect the original afterwards.
#[derive(Clone)]
pub struct MockBackend {
    /// Text returned by `generate_text`; `None` makes every call fail
    response: Option<String>,
    /// Whether health_check should return true
    pub healthy: bool,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend returning a fenced five-item JSON array
    pub fn new() -> Self {
        Self::with_response(DEFAULT_RESPONSE)
    }

    /// Create a mock backend returning `response` verbatim
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            healthy: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock backend whose calls always fail
    pub fn failing() -> Self {
        Self {
            response: None,
            healthy: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `generate_text` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockBackend {
    async fn generate_text(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| Error::RemoteGeneration("mock backend configured to fail".into()))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
