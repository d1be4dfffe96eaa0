//! Configuration for Ledgerwise
//!
//! Config is resolved in three layers:
//! 1. Explicit path (`--config`) or the user override
//!    (~/.config/ledgerwise/config.toml)
//! 2. Embedded defaults (compiled into binary)
//! 3. Environment variables, applied on top of whichever file was loaded
//!
//! Environment variables:
//! - `AI_BACKEND`: gemini, openai_compatible, mock
//! - `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_HOST`
//! - `OPENAI_COMPATIBLE_HOST`, `OPENAI_COMPATIBLE_MODEL`, `OPENAI_COMPATIBLE_API_KEY`
//! - `LEDGERWISE_CURRENCY`: currency symbol used in prompts
//! - `LEDGERWISE_AI_TIMEOUT_SECS`: provider request timeout

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/ledgerwise.toml");

/// Which text-generation backend to use for remote insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Gemini,
    #[serde(alias = "openai", alias = "vllm", alias = "localai")]
    OpenaiCompatible,
    Mock,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Gemini => "gemini",
            BackendKind::OpenaiCompatible => "openai_compatible",
            BackendKind::Mock => "mock",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(BackendKind::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" => {
                Ok(BackendKind::OpenaiCompatible)
            }
            "mock" => Ok(BackendKind::Mock),
            _ => Err(format!("Unknown AI backend: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub host: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            host: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAICompatibleConfig {
    pub host: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for OpenAICompatibleConfig {
    fn default() -> Self {
        Self {
            host: None,
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub backend: BackendKind,
    pub timeout_secs: u64,
    pub gemini: GeminiConfig,
    pub openai_compatible: OpenAICompatibleConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            timeout_secs: 30,
            gemini: GeminiConfig::default(),
            openai_compatible: OpenAICompatibleConfig::default(),
        }
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            ai: AiConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `path`, the user override, or the embedded defaults,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = load_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply overrides from a key lookup (normally the process environment).
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(backend) = get("AI_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.ai.backend = kind,
                Err(e) => tracing::warn!(error = %e, "Ignoring AI_BACKEND"),
            }
        }
        if let Some(secs) = get("LEDGERWISE_AI_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.ai.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %secs, "Ignoring invalid LEDGERWISE_AI_TIMEOUT_SECS"),
            }
        }
        if let Some(symbol) = get("LEDGERWISE_CURRENCY") {
            self.currency_symbol = symbol;
        }

        if let Some(key) = get("GEMINI_API_KEY") {
            self.ai.gemini.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.ai.gemini.model = model;
        }
        if let Some(host) = get("GEMINI_HOST") {
            self.ai.gemini.host = host;
        }

        if let Some(host) = get("OPENAI_COMPATIBLE_HOST") {
            self.ai.openai_compatible.host = Some(host);
        }
        if let Some(model) = get("OPENAI_COMPATIBLE_MODEL") {
            self.ai.openai_compatible.model = model;
        }
        if let Some(key) = get("OPENAI_COMPATIBLE_API_KEY") {
            self.ai.openai_compatible.api_key = Some(key);
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ledgerwise").join("config.toml"))
}

fn load_file(path: Option<&Path>) -> Result<Config> {
    let content = match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(default_path) => fs::read_to_string(&default_path)?,
            None => DEFAULT_CONFIG.to_string(),
        },
    };

    Config::from_toml(&content)
}
