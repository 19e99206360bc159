//! Configuration management for corpscout
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. The resulting [`Config`] is built once at startup
//! and handed to every collaborator by reference.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::matching::DEFAULT_MATCH_THRESHOLD;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// LLM gateway configuration
    pub llm: LlmConfig,

    /// Search provider configuration
    pub search: SearchConfig,

    /// Wikipedia configuration
    pub wikipedia: WikipediaConfig,

    /// Company database configuration
    pub company_db: CompanyDbConfig,

    /// Local report store configuration
    pub storage: StorageConfig,

    /// Gap analysis configuration
    pub matching: MatchingConfig,

    /// Research pipeline configuration
    pub research: ResearchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// LLM gateway configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gateway base URL, `/chat/completions` is appended
    pub endpoint: String,

    /// API key; required at startup
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Cheap general-purpose model for structured-field extraction
    pub fast_model: String,

    /// Web-connected model for fact finding
    pub web_model: String,

    /// Larger reasoning model used for bulk extraction and as fallback
    pub deep_model: String,

    /// Default request timeout in seconds
    pub timeout_secs: u64,

    /// Timeout for bulk event extraction in seconds
    pub extraction_timeout_secs: u64,

    /// Timeout for per-event enrichment in seconds
    pub enrichment_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://openrouter.ai/api/v1"),
            api_key: None,
            fast_model: String::from("openai/gpt-4o-mini"),
            web_model: String::from("perplexity/sonar-pro"),
            deep_model: String::from("anthropic/claude-3.5-sonnet"),
            timeout_secs: 20,
            extraction_timeout_secs: 180,
            enrichment_timeout_secs: 45,
        }
    }
}

/// Search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint URL
    pub endpoint: String,

    /// API key; search is disabled without it
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Interface language
    pub hl: String,

    /// Country
    pub gl: String,

    /// Minimum interval between queries in milliseconds
    pub query_interval_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://serpapi.com/search.json"),
            api_key: None,
            hl: String::from("en"),
            gl: String::from("us"),
            query_interval_ms: 500,
            timeout_secs: 20,
        }
    }
}

/// Wikipedia configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    /// Base URL of the wiki
    pub endpoint: String,

    /// Summary request timeout in seconds
    pub timeout_secs: u64,

    /// Article page timeout in seconds
    pub page_timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://en.wikipedia.org"),
            timeout_secs: 5,
            page_timeout_secs: 10,
            user_agent: format!("corpscout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Company database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyDbConfig {
    /// Base URL; the database is skipped when absent
    pub base_url: Option<String>,

    /// Lookup by website URL
    pub lookup_path: String,

    /// Fetch full company record, `{id}` is substituted
    pub company_path: String,

    /// Fetch corporate events list
    pub events_path: String,

    /// Create a corporate event; creation is disabled when absent
    pub create_event_path: Option<String>,

    /// Currency code to database currency id
    pub currency_ids: HashMap<String, u32>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CompanyDbConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            lookup_path: String::from("/api:8Bv5PK4I/get_company_by_url"),
            company_path: String::from("/api:8Bv5PK4I/Get_new_company/{id}"),
            events_path: String::from("/api:y4OAXSVm/Get_investors_corporate_events"),
            create_event_path: None,
            currency_ids: HashMap::new(),
            timeout_secs: 15,
        }
    }
}

/// Local report store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path
    pub sqlite_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("data/reports.db"),
        }
    }
}

/// Gap analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Keyword-overlap threshold for calling two events the same
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Research pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Maximum number of events requested from the model
    pub max_events: usize,

    /// Run the per-event enrichment pass
    pub enrich_events: bool,

    /// Look up LinkedIn profiles for executives through the search provider
    pub linkedin_lookup: bool,

    /// Persist each analysis in the report store
    pub store_reports: bool,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_events: 20,
            enrich_events: true,
            linkedin_lookup: true,
            store_reports: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        config.apply_env();
        Ok(config)
    }

    /// Load from the given file if any, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    fn apply_env(&mut self) {
        let _ = dotenvy::dotenv();

        if let Some(key) = env_nonempty("OPENROUTER_API_KEY").or_else(|| env_nonempty("OPEN_ROUTER_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(endpoint) = env_nonempty("OPENROUTER_URL") {
            self.llm.endpoint = endpoint;
        }
        if let Some(key) = env_nonempty("SERPAPI_KEY") {
            self.search.api_key = Some(key);
        }
        if let Some(url) = env_nonempty("COMPANY_DB_URL") {
            self.company_db.base_url = Some(url);
        }
        if let Some(path) = env_nonempty("CORPSCOUT_SQLITE_PATH") {
            self.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(threshold) = env_nonempty("CORPSCOUT_MATCH_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.matching.threshold = threshold;
        }
        if let Some(max_events) = env_nonempty("CORPSCOUT_MAX_EVENTS").and_then(|v| v.parse().ok()) {
            self.research.max_events = max_events;
        }
        if let Some(level) = env_nonempty("CORPSCOUT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_nonempty("CORPSCOUT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    ///
    /// A missing LLM gateway key is the one fatal startup condition.
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.as_deref().map_or(true, str::is_empty) {
            anyhow::bail!("Missing OPENROUTER_API_KEY or OPEN_ROUTER_KEY in environment variables");
        }

        if !(0.0..=1.0).contains(&self.matching.threshold) {
            anyhow::bail!("matching.threshold must be between 0.0 and 1.0");
        }

        if self.research.max_events == 0 {
            anyhow::bail!("research.max_events must be greater than 0");
        }

        if self.llm.timeout_secs == 0 || self.search.timeout_secs == 0 {
            anyhow::bail!("timeouts must be greater than 0");
        }

        Ok(())
    }

    /// Whether the search provider can be used
    pub fn search_enabled(&self) -> bool {
        self.search.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Interval between consecutive search queries
    #[must_use]
    pub fn query_interval(&self) -> Duration {
        Duration::from_millis(self.search.query_interval_ms)
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn test_default_needs_api_key() {
        let mut config = Config::default();
        config.llm.api_key = None;
        assert!(config.validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = valid_config();
        config.matching.threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_threshold_and_interval() {
        let config = Config::default();
        assert!((config.matching.threshold - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.query_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [research]
            max_events = 5

            [company_db]
            base_url = "https://db.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.research.max_events, 5);
        assert!(config.research.enrich_events);
        assert_eq!(config.company_db.base_url.as_deref(), Some("https://db.example.com"));
        assert_eq!(config.llm.web_model, "perplexity/sonar-pro");
    }
}
