//! Error types for the Maitred domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Each bounded context
//! has its own error enum; only [`AgentError::Unavailable`] ever reaches
//! the entry adapter as a hard failure — everything below the agent loop
//! is absorbed into the transcript as a conversational observation.

use thiserror::Error;

/// The top-level error type for all Maitred operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Reasoner error: {0}")]
    Reasoner(#[from] ReasonerError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the language-model capability itself.
#[derive(Debug, Clone, Error)]
pub enum ReasonerError {
    #[error("API request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Reasoner not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of a catalog operation. Always folded into the transcript,
/// never raised to the caller.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Operation not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },

    #[error("Operation failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Operation timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },
}

/// Failures of the hotel REST backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend rejected the request: {body} (status: {status})")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

/// The only failure the entry adapter ever sees: the reasoning capability
/// is unreachable. Tool and backend failures never surface here.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Agent unavailable: {0}")]
    Unavailable(String),
}

impl From<ReasonerError> for AgentError {
    fn from(e: ReasonerError) -> Self {
        AgentError::Unavailable(e.to_string())
    }
}
