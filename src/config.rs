//! Configuration module for Guardrail Core.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::engine::{
    ABSOLUTE_CLAIM_PATTERNS, CITATION_PATTERNS, DEFAULT_REWRITE_THRESHOLD,
    DEFAULT_WARN_THRESHOLD, INJECTION_PATTERNS, STATISTIC_PATTERNS, UNSAFE_PATTERNS,
};

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines for local development.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when RUST_LOG is not set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            filter: "guardrail_core=info,tower_http=info".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which text-generation backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Canned responses for local development.
    Mock,
    /// OpenRouter chat completions.
    Openrouter,
}

/// Text-generation backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// API key for OpenRouter.
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional system prompt sent ahead of the user prompt.
    pub system_prompt: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Mock,
            api_key: String::new(),
            model: "openai/gpt-4o-mini".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            timeout_secs: 30,
            system_prompt: None,
        }
    }
}

/// Pattern tables and thresholds for the built-in rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub injection_patterns: Vec<String>,
    pub unsafe_patterns: Vec<String>,
    pub absolute_claim_patterns: Vec<String>,
    pub citation_patterns: Vec<String>,
    pub statistic_patterns: Vec<String>,
    /// Hallucination score at which output is rewritten.
    pub rewrite_threshold: u32,
    /// Hallucination score at which output gets a disclaimer.
    pub warn_threshold: u32,
}

fn to_owned_table(table: &[&str]) -> Vec<String> {
    table.iter().map(|p| p.to_string()).collect()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            injection_patterns: to_owned_table(INJECTION_PATTERNS),
            unsafe_patterns: to_owned_table(UNSAFE_PATTERNS),
            absolute_claim_patterns: to_owned_table(ABSOLUTE_CLAIM_PATTERNS),
            citation_patterns: to_owned_table(CITATION_PATTERNS),
            statistic_patterns: to_owned_table(STATISTIC_PATTERNS),
            rewrite_threshold: DEFAULT_REWRITE_THRESHOLD,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GUARDRAIL_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("GUARDRAIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
