//! Configuration loading
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! TOML file, `PAPER_DIGEST__SECTION__KEY` environment variables and finally
//! the well-known variables read by [`Config::from_env`] (`OPENAI_API_KEY`
//! and friends). A `.env` file is loaded first when present.

use crate::error::{DigestError, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub summarization: SummarizationConfig,

    #[serde(default)]
    pub sections: SectionsConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Language model gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (read from env OPENAI_API_KEY if not set)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Base backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl LlmConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Budgets for the summarization engine and the answer request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationConfig {
    /// Documents estimated below this many tokens are summarized in one request
    #[serde(default = "default_direct_threshold")]
    pub direct_threshold_tokens: usize,

    /// Word units per chunk on the hierarchical path
    #[serde(default = "default_chunk_units")]
    pub chunk_units: usize,

    #[serde(default = "default_section_max_tokens")]
    pub section_max_tokens: usize,

    #[serde(default = "default_document_max_tokens")]
    pub document_max_tokens: usize,

    #[serde(default = "default_chunk_max_tokens")]
    pub chunk_max_tokens: usize,

    #[serde(default = "default_combine_max_tokens")]
    pub combine_max_tokens: usize,

    #[serde(default = "default_answer_max_tokens")]
    pub answer_max_tokens: usize,

    /// Sampling temperature for every request
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_direct_threshold() -> usize {
    12_000
}

fn default_chunk_units() -> usize {
    2_000
}

fn default_section_max_tokens() -> usize {
    200
}

fn default_document_max_tokens() -> usize {
    500
}

fn default_chunk_max_tokens() -> usize {
    500
}

fn default_combine_max_tokens() -> usize {
    500
}

fn default_answer_max_tokens() -> usize {
    300
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            direct_threshold_tokens: default_direct_threshold(),
            chunk_units: default_chunk_units(),
            section_max_tokens: default_section_max_tokens(),
            document_max_tokens: default_document_max_tokens(),
            chunk_max_tokens: default_chunk_max_tokens(),
            combine_max_tokens: default_combine_max_tokens(),
            answer_max_tokens: default_answer_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Which sections to extract and how to recognise them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsConfig {
    /// Sections summarized during processing, in order
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// Headings that end a section
    #[serde(default = "default_boundaries")]
    pub boundaries: Vec<String>,

    /// Extra heading variants, merged over the built-in table
    #[serde(default)]
    pub variants: BTreeMap<String, Vec<String>>,
}

fn default_targets() -> Vec<String> {
    vec!["Abstract".into(), "Methods".into(), "Results".into()]
}

fn default_boundaries() -> Vec<String> {
    crate::sections::DEFAULT_BOUNDARIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            boundaries: default_boundaries(),
            variants: BTreeMap::new(),
        }
    }
}

/// Question-answering retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Paragraphs added to the summary as context
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `paper_digest=debug`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load `.env`, the optional file, prefixed environment variables, then
    /// the well-known overrides, and validate the result
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // A missing .env is the common case
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("PAPER_DIGEST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| DigestError::Configuration(e.to_string()))?;
        let config: Config = settings
            .try_deserialize()
            .map_err(|e| DigestError::Configuration(e.to_string()))?;

        let config = config.from_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply well-known environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            if !val.trim().is_empty() {
                self.llm.api_key = Some(SecretString::new(val));
            }
        }

        if let Ok(val) = std::env::var("OPENAI_API_URL") {
            self.llm.api_url = val;
        }

        if let Ok(val) = std::env::var("OPENAI_MODEL") {
            self.llm.model = val;
        }

        if let Ok(val) = std::env::var("PAPER_DIGEST_LOG") {
            self.logging.level = val;
        }

        self
    }

    /// Check that budgets are consistent
    pub fn validate(&self) -> Result<()> {
        let s = &self.summarization;

        if s.chunk_units == 0 || s.direct_threshold_tokens == 0 {
            return Err(DigestError::Configuration(
                "summarization budgets must be positive".to_string(),
            ));
        }

        if s.chunk_units >= s.direct_threshold_tokens {
            return Err(DigestError::Configuration(format!(
                "chunk_units ({}) must be below direct_threshold_tokens ({})",
                s.chunk_units, s.direct_threshold_tokens
            )));
        }

        if !(0.0..=2.0).contains(&s.temperature) {
            return Err(DigestError::Configuration(format!(
                "temperature {} outside 0.0..=2.0",
                s.temperature
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(DigestError::Configuration(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.summarization.direct_threshold_tokens, 12_000);
        assert_eq!(config.summarization.chunk_units, 2_000);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.sections.targets, vec!["Abstract", "Methods", "Results"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunk_budget_must_be_below_threshold() {
        let mut config = Config::default();
        config.summarization.chunk_units = 12_000;
        assert!(matches!(
            config.validate(),
            Err(DigestError::Configuration(_))
        ));
    }

    #[test]
    fn test_temperature_range() {
        let mut config = Config::default();
        config.summarization.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [llm]
            model = "gpt-4o-mini"
            api_key = "sk-test"

            [sections.variants]
            Discussion = ["General Discussion"]
        "#;

        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_ref().unwrap().expose_secret(), "sk-test");
        assert_eq!(config.llm.timeout(), Duration::from_secs(60));
        assert_eq!(config.summarization.answer_max_tokens, 300);
        assert_eq!(
            config.sections.variants.get("Discussion").unwrap(),
            &vec!["General Discussion".to_string()]
        );
    }
}
