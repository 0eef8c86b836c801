//! # Maitred Core
//!
//! Domain types, traits, and error definitions for the Maitred hotel
//! concierge agent. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external capability is defined as a trait here: the language
//! model behind [`Reasoner`], each backend operation behind [`Tool`].
//! Implementations live in their respective crates. This enables:
//! - Deterministic testing of the agent loop with stub reasoners and tools
//! - Swapping the model provider without touching the loop
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod reasoner;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{AgentError, BackendError, Error, ReasonerError, Result, ToolError};
pub use message::{Conversation, Message, MessageToolCall, Role, ThreadId};
pub use reasoner::{Reasoner, ReasonerRequest, ReasonerResponse, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
