use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language identifier (ISO code or engine-style identifier)
    pub source_language: String,

    /// Target language identifier (ISO code or engine-style identifier)
    pub target_language: String,

    /// Number of scheduler epochs the outstanding work is split into
    #[serde(default = "default_epochs")]
    pub epochs: usize,

    /// Suffix filter for corpus input files
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Translation engine config
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation engine endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Engine service URL
    #[serde(default = "default_engine_endpoint")]
    pub endpoint: String,

    /// Model identifier forwarded to the engine
    #[serde(default = "default_engine_model")]
    pub model: String,

    /// Max sentence characters per engine request; an epoch is subdivided
    /// into requests under this budget
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    /// Max concurrent engine requests within one epoch
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of retry attempts per request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff time in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_engine_endpoint(),
            model: default_engine_model(),
            max_chars_per_request: default_max_chars_per_request(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
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

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "eng".to_string(),
            target_language: default_target_language(),
            epochs: default_epochs(),
            suffix: default_suffix(),
            engine: EngineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// Hard failures are things no run can proceed with (bad endpoint, zero
    /// epochs). Unrecognized language identifiers only warn, since the engine
    /// may understand identifiers this tool does not.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(anyhow!("Epoch count must be at least 1"));
        }

        if self.suffix.is_empty() {
            return Err(anyhow!("Input suffix filter must not be empty"));
        }

        if self.engine.max_chars_per_request == 0 {
            return Err(anyhow!("Engine max_chars_per_request must be at least 1"));
        }

        if self.engine.concurrent_requests == 0 {
            return Err(anyhow!("Engine concurrent_requests must be at least 1"));
        }

        Url::parse(&self.engine.endpoint)
            .map_err(|e| anyhow!("Invalid engine endpoint '{}': {}", self.engine.endpoint, e))?;

        Ok(())
    }
}

/// Derive a default target language from the process locale.
///
/// Mirrors the usual `LANG=fr_FR.UTF-8` shape: the part before the first
/// separator is the language code. Falls back to English when unset or
/// unparseable.
pub fn default_target_language() -> String {
    let lang = std::env::var("LANG").unwrap_or_default();
    let code = lang.split(['.', '_']).next().unwrap_or("");

    match language_utils::normalize_to_part2t(code) {
        Ok(normalized) => normalized,
        Err(_) => "eng".to_string(),
    }
}

fn default_epochs() -> usize {
    1
}

fn default_suffix() -> String {
    ".txt".to_string()
}

fn default_engine_endpoint() -> String {
    "http://localhost:8090".to_string()
}

fn default_engine_model() -> String {
    "nllb-200-distilled-600M".to_string()
}

fn default_max_chars_per_request() -> usize {
    4000
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}
