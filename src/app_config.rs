use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and resolving runtime settings for a translation run.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language mode (auto-detect per entry, or force one language)
    #[serde(default)]
    pub source_language: SourceLanguageMode,

    /// Target language for the run
    #[serde(default)]
    pub target_language: TargetLanguage,

    /// Items per translation request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Queue every entry for translation, ignoring language heuristics
    #[serde(default)]
    pub force_all: bool,

    /// Free-text domain hint included in the prompt
    #[serde(default)]
    pub domain_context: Option<String>,

    /// Provider config
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Retry config
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Target language for a translation run
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    // @target: Norwegian Bokmål
    #[default]
    Nb,
    // @target: Swedish
    Sv,
    // @target: Danish
    Da,
}

impl TargetLanguage {
    // @returns: Human-readable language name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nb => "Norwegian Bokmål",
            Self::Sv => "Swedish",
            Self::Da => "Danish",
        }
    }

    // @returns: Lowercase language code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Nb => "nb",
            Self::Sv => "sv",
            Self::Da => "da",
        }
    }
}

// Implement Display trait for TargetLanguage
impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// Implement FromStr trait for TargetLanguage
impl std::str::FromStr for TargetLanguage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "nb" => Ok(Self::Nb),
            "sv" => Ok(Self::Sv),
            "da" => Ok(Self::Da),
            _ => Err(anyhow!("Invalid target language: {}", s)),
        }
    }
}

/// Source language selection policy for work-item building
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguageMode {
    // @mode: Detect per entry
    #[default]
    Auto,
    // @mode: Force English source
    En,
    // @mode: Force German source
    De,
}

impl SourceLanguageMode {
    // @returns: Lowercase mode identifier
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl std::fmt::Display for SourceLanguageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for SourceLanguageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            _ => Err(anyhow!("Invalid source language mode: {}", s)),
        }
    }
}

/// Provider configuration for the OpenAI-compatible endpoint
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

/// Retry settings applied around each translation call
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct RetryConfig {
    /// Attempt ceiling before a call failure escalates
    #[serde(default = "default_retry_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Backoff floor in milliseconds
    #[serde(default = "default_retry_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_retry_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_max_attempts(),
            base_delay_ms: default_retry_base_delay_ms(),
            min_delay_ms: default_retry_min_delay_ms(),
            max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_batch_size() -> usize {
    50
}

/// Batch size ceiling; one model call per batch bounds the unit of latency
pub const MAX_BATCH_SIZE: usize = 50;

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.2
}

fn default_retry_max_attempts() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_retry_min_delay_ms() -> u64 {
    2000
}

fn default_retry_max_delay_ms() -> u64 {
    20000
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path.as_ref(), e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 || self.batch_size > MAX_BATCH_SIZE {
            return Err(anyhow!(
                "Batch size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE,
                self.batch_size
            ));
        }

        if self.provider.model.is_empty() {
            return Err(anyhow!("Model name must not be empty"));
        }

        Url::parse(&self.provider.endpoint).map_err(|e| {
            anyhow!("Invalid provider endpoint '{}': {}", self.provider.endpoint, e)
        })?;

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.provider.temperature
            ));
        }

        if self.retry.max_attempts < 1 {
            return Err(anyhow!("Retry max_attempts must be at least 1"));
        }

        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            return Err(anyhow!(
                "Retry min_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.retry.min_delay_ms,
                self.retry.max_delay_ms
            ));
        }

        Ok(())
    }

    /// Resolve the API key, falling back to the OPENAI_API_KEY environment
    /// variable. Required for live runs only; a dry run never calls this.
    pub fn ensure_api_key(&self) -> Result<String> {
        if !self.provider.api_key.is_empty() {
            return Ok(self.provider.api_key.clone());
        }
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(anyhow!(
                "No API key configured. Set OPENAI_API_KEY, use --api-key, or add it to the config file"
            )),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: SourceLanguageMode::default(),
            target_language: TargetLanguage::default(),
            batch_size: default_batch_size(),
            force_all: false,
            domain_context: None,
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
