use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::retry::RetryPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (`serve` subcommand only)
    pub bind_addr: String,
    /// Generative-text oracle configuration
    pub llm: LlmConfig,
    /// Encyclopedia (MediaWiki) configuration
    pub wiki: WikiConfig,
    /// Candidate selection configuration
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama", "openai" or "gemini"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for refinement, scoring and topic classification
    pub chat_model: String,
    /// API key (only needed for cloud providers)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt when the provider reports a quota error
    pub max_retries: u32,
    /// Wait between quota retries, in seconds
    pub quota_backoff_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiConfig {
    /// MediaWiki Action API endpoint
    pub api_url: String,
    /// Sent as `User-Agent`; Wikimedia rejects anonymous clients
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after the first attempt on HTTP 429
    pub max_retries: u32,
    /// Linear backoff step in seconds (`step * (attempt + 1)`)
    pub backoff_step_secs: u64,
    /// Maximum number of titles requested from search
    pub search_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Scores at or above this are reported as confident matches
    pub acceptance_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            wiki: WikiConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            api_key: None,
            timeout_secs: 120,
            max_retries: 3,
            quota_backoff_secs: 60,
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            user_agent: concat!("wiki-answer/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            max_retries: 2,
            backoff_step_secs: 2,
            search_limit: 5,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.7,
        }
    }
}

impl LlmConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_retries, Duration::from_secs(self.quota_backoff_secs))
    }
}

impl WikiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.max_retries, Duration::from_secs(self.backoff_step_secs))
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("WIKI_ANSWER_BIND_ADDR") {
            config.bind_addr = addr;
        }

        // LLM config
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.llm.timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("LLM_MAX_RETRIES") {
            if let Ok(v) = val.parse() {
                config.llm.max_retries = v;
            }
        }
        if let Ok(val) = std::env::var("LLM_QUOTA_BACKOFF_SECS") {
            if let Ok(v) = val.parse() {
                config.llm.quota_backoff_secs = v;
            }
        }

        // Wikipedia config
        if let Ok(url) = std::env::var("WIKI_API_URL") {
            config.wiki.api_url = url;
        }
        if let Ok(agent) = std::env::var("WIKI_USER_AGENT") {
            config.wiki.user_agent = agent;
        }
        if let Ok(val) = std::env::var("WIKI_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.wiki.timeout_secs = v;
            }
        }
        if let Ok(val) = std::env::var("WIKI_MAX_RETRIES") {
            if let Ok(v) = val.parse() {
                config.wiki.max_retries = v;
            }
        }
        if let Ok(val) = std::env::var("WIKI_BACKOFF_STEP_SECS") {
            if let Ok(v) = val.parse() {
                config.wiki.backoff_step_secs = v;
            }
        }
        if let Ok(val) = std::env::var("WIKI_SEARCH_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                config.wiki.search_limit = v.max(1);
            }
        }

        if let Ok(val) = std::env::var("WIKI_ANSWER_ACCEPT_THRESHOLD") {
            match parse_threshold(&val) {
                Some(v) => config.pipeline.acceptance_threshold = v,
                None => tracing::warn!("Ignoring invalid WIKI_ANSWER_ACCEPT_THRESHOLD: {val}"),
            }
        }

        config
    }
}

/// A finite threshold clamped into `[0.0, 1.0]`; NaN and infinities are rejected.
fn parse_threshold(val: &str) -> Option<f32> {
    val.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
