//! Pluggable text-generation backend abstraction
//!
//! Remote insights are produced by sending a single prompt to an external
//! text-generation service and reading back raw text. This module hides which
//! service that is.
//!
//! # Architecture
//!
//! - `TextGenerator` trait: the interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let ai = AIClient::from_config(&config.ai);
//!
//! // None means no credential: callers use local rules instead
//! if let Some(ref client) = ai {
//!     let text = client.generate_text("Say hi as a JSON array").await?;
//! }
//! ```

mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;

use crate::config::{AiConfig, BackendKind};
use crate::error::Result;

/// Trait defining the interface for all text-generation backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the generated text
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Gemini `generateContent` API
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from configuration
    ///
    /// Returns None when the selected backend has no credential or host
    /// configured. A missing credential is not an error: it selects the
    /// local rule-based insights.
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let timeout = config.timeout();

        match config.backend {
            BackendKind::Gemini => {
                let api_key = config
                    .gemini
                    .api_key
                    .as_deref()
                    .filter(|k| !k.trim().is_empty())?;
                Some(AIClient::Gemini(
                    GeminiBackend::new(&config.gemini.host, &config.gemini.model, api_key)
                        .with_timeout(timeout),
                ))
            }
            BackendKind::OpenaiCompatible => {
                let host = config.openai_compatible.host.as_deref()?;
                let mut backend =
                    OpenAICompatibleBackend::new(host, &config.openai_compatible.model);
                if let Some(ref key) = config.openai_compatible.api_key {
                    backend = backend.with_api_key(key);
                }
                Some(AIClient::OpenAICompatible(backend.with_timeout(timeout)))
            }
            BackendKind::Mock => Some(AIClient::Mock(MockBackend::new())),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Short backend name for display
    pub fn backend_name(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        }
    }
}

// Implement TextGenerator for AIClient by delegating to the inner backend
#[async_trait]
impl TextGenerator for AIClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        match self {
            AIClient::Gemini(b) => b.generate_text(prompt).await,
            AIClient::OpenAICompatible(b) => b.generate_text(prompt).await,
            AIClient::Mock(b) => b.generate_text(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
        assert_eq!(client.backend_name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_gemini_without_key() {
        let config = AiConfig::default();
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_gemini_blank_key() {
        let mut config = AiConfig::default();
        config.gemini.api_key = Some("   ".to_string());
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_gemini_with_key() {
        let mut config = AiConfig::default();
        config.gemini.api_key = Some("test-key".to_string());
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.backend_name(), "gemini");
        assert_eq!(client.model(), "gemini-1.5-flash");
        assert_eq!(client.host(), "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn test_from_config_openai_requires_host() {
        let mut config = AiConfig {
            backend: BackendKind::OpenaiCompatible,
            ..AiConfig::default()
        };
        assert!(AIClient::from_config(&config).is_none());

        config.openai_compatible.host = Some("http://localhost:8000/".to_string());
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.backend_name(), "openai_compatible");
        assert_eq!(client.host(), "http://localhost:8000");
    }

    #[test]
    fn test_from_config_follows_env_overrides() {
        let mut config = crate::config::Config::default();
        config.apply_overrides(|key| match key {
            "GEMINI_API_KEY" => Some("env-key".to_string()),
            "GEMINI_MODEL" => Some("gemini-2.0-flash".to_string()),
            "GEMINI_HOST" => Some("http://localhost:9000/".to_string()),
            _ => None,
        });

        let client = AIClient::from_config(&config.ai).unwrap();
        assert_eq!(client.backend_name(), "gemini");
        assert_eq!(client.model(), "gemini-2.0-flash");
        assert_eq!(client.host(), "http://localhost:9000");
    }

    #[test]
    fn test_from_config_mock() {
        let config = AiConfig {
            backend: BackendKind::Mock,
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.backend_name(), "mock");
    }
}
