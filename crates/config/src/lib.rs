//! Configuration loading, validation, and management for Maitred.
//!
//! Loads configuration from `~/.maitred/config.toml` with environment
//! variable overrides. Validates all settings at startup. Secrets are
//! redacted from `Debug` output.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.maitred/config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Language-model (reasoner) configuration
    #[serde(default)]
    pub reasoner: ReasonerConfig,

    /// Hotel backend API configuration
    #[serde(default)]
    pub hotel: HotelConfig,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Agent loop tunables
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gateway (HTTP entry adapter) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Language-model settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReasonerConfig {
    /// API key for the model provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat-completions base URL
    #[serde(default = "default_reasoner_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_reasoner_url() -> String {
    "https://api.mistral.ai/v1".into()
}
fn default_model() -> String {
    "mistral-large-latest".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_reasoner_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Hotel REST backend settings.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct HotelConfig {
    /// Base URL of the hotel API (e.g. "https://hotel.example.com/api")
    #[serde(default)]
    pub api_url: String,

    /// Token for the `Authorization: Token <key>` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_timeout() -> u64 {
    15
}

/// Web search (Tavily) settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Tavily API key; search tool is omitted from the catalog without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Maximum results per search
    #[serde(default = "default_search_results")]
    pub max_results: u32,
}

fn default_search_results() -> u32 {
    2
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_results: default_search_results(),
        }
    }
}

/// Agent loop tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum reasoning/operation cycles per turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Number of `[ANGRY]` replies after which the turn is closed out
    #[serde(default = "default_escalation_threshold")]
    pub escalation_threshold: usize,

    /// Timeout for one reasoning call, in seconds
    #[serde(default = "default_reason_timeout")]
    pub reason_timeout_secs: u64,

    /// Timeout for one operation dispatch, in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// Thread id used when the caller does not supply one
    #[serde(default = "default_thread")]
    pub default_thread: String,
}

fn default_max_iterations() -> u32 {
    8
}
fn default_escalation_threshold() -> usize {
    3
}
fn default_reason_timeout() -> u64 {
    60
}
fn default_tool_timeout() -> u64 {
    20
}
fn default_thread() -> String {
    "front-desk".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            escalation_threshold: default_escalation_threshold(),
            reason_timeout_secs: default_reason_timeout(),
            tool_timeout_secs: default_tool_timeout(),
            default_thread: default_thread(),
        }
    }
}

/// Gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ReasonerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasonerConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl std::fmt::Debug for HotelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotelConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &redact(&self.api_token))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("max_results", &self.max_results)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("reasoner", &self.reasoner)
            .field("hotel", &self.hotel)
            .field("search", &self.search)
            .field("agent", &self.agent)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.maitred/config.toml).
    ///
    /// Environment variables take precedence over the file:
    /// - `MISTRAL_API_KEY` — reasoner key
    /// - `TAVILY_API_KEY` — web search key
    /// - `HOTEL_API_URL` / `HOTEL_API_TOKEN` — backend connector
    /// - `MAITRED_MODEL` — model override
    /// - `MAITRED_THREAD_ID` — default thread id
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(key) = std::env::var("MISTRAL_API_KEY") {
            config.reasoner.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            config.search.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("HOTEL_API_URL") {
            config.hotel.api_url = url;
        }
        if let Ok(token) = std::env::var("HOTEL_API_TOKEN") {
            config.hotel.api_token = Some(token);
        }
        if let Ok(model) = std::env::var("MAITRED_MODEL") {
            config.reasoner.model = model;
        }
        if let Ok(thread) = std::env::var("MAITRED_THREAD_ID") {
            config.agent.default_thread = thread;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".maitred")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reasoner.temperature < 0.0 || self.reasoner.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "reasoner.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }
        if self.agent.escalation_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "agent.escalation_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
