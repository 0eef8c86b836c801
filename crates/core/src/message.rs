//! Message and Conversation domain types.
//!
//! These are the value objects that flow through the whole system:
//! a guest sends a message → the agent loop reasons over the transcript →
//! tool results are folded back in → the final reply is appended.
//!
//! Messages are immutable once appended; a [`Conversation`] is append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a conversation thread (one guest's session).
///
/// Opaque to the agent — the entry adapter decides how ids are minted
/// (query parameter, config default, generated).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The hotel guest
    User,
    /// The concierge assistant
    Assistant,
    /// System instructions (policy, tone rules)
    System,
    /// Backend operation result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Operations requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is an operation result, which tool call it answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message answering the given call.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }
}

/// An operation invocation embedded in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the catalog operation to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// The ordered transcript of one thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// The owning thread
    pub id: ThreadId,

    /// Ordered messages, insertion order is causal order
    pub messages: Vec<Message>,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was appended
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation for a fresh thread id.
    pub fn new() -> Self {
        Self::for_thread(ThreadId::new())
    }

    /// Create a new empty conversation owned by `id`.
    pub fn for_thread(id: ThreadId) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message. Messages are never removed or edited.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    /// Number of assistant replies whose text starts with `prefix`.
    ///
    /// Used by the tone-escalation policy to count `[ANGRY]` replies.
    pub fn assistant_replies_with_prefix(&self, prefix: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant && m.content.starts_with(prefix))
            .count()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
