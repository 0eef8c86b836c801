//! Reasoner trait — the abstraction over the language-model capability.
//!
//! The agent loop treats the model as an opaque function from a transcript
//! plus an operation catalog to either a final natural-language message or
//! a batch of requested operation invocations. That union is encoded the
//! way the wire protocol encodes it: an assistant [`Message`] whose
//! `tool_calls` vector is empty (final reply) or non-empty (invocations).
//!
//! Implementations: Mistral (production), stubs (tests).

use crate::error::ReasonerError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single reasoning request: the full transcript plus the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonerRequest {
    /// The model to use (e.g., "mistral-large-latest")
    pub model: String,

    /// The conversation messages, system instruction first
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// The operation catalog the model may draw from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A catalog entry as presented to the model.
///
/// The description is consumed only by the model for operation selection —
/// the loop never parses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique operation name
    pub name: String,

    /// What the operation does, including any advisory policies
    pub description: String,

    /// JSON Schema describing the operation's parameters
    pub parameters: serde_json::Value,
}

/// The model's answer to one reasoning step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonerResponse {
    /// The generated assistant message; `tool_calls` non-empty means the
    /// model is requesting operations rather than replying
    pub message: Message,

    /// Token usage statistics, when the provider reports them
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

impl ReasonerResponse {
    /// Whether this response is a final reply (no operations requested).
    pub fn is_final(&self) -> bool {
        self.message.tool_calls.is_empty()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Reasoner trait.
///
/// The agent loop calls `complete()` without knowing which provider backs
/// it; tests substitute deterministic stubs, which keeps the whole loop
/// deterministic given deterministic model output.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// A human-readable name for this reasoner (e.g., "mistral").
    fn name(&self) -> &str;

    /// Run one reasoning step over the transcript and catalog.
    async fn complete(
        &self,
        request: ReasonerRequest,
    ) -> std::result::Result<ReasonerResponse, ReasonerError>;
}
