//! Tool trait — the Operation Catalog contract.
//!
//! Each backend operation (guest CRUD, reservation management, listings,
//! web search) implements this trait. Tools are registered in the
//! [`ToolRegistry`] at startup — an explicit data table, not reflection —
//! and made available to the agent loop.

use crate::error::ToolError;
use crate::reasoner::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A request to execute one catalog operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the model's tool_call.id)
    pub id: String,

    /// Name of the operation to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The result of one operation. Success or failure, it is always folded
/// back into the transcript as an observation for the next reasoning step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the operation succeeded
    pub success: bool,

    /// The payload: backend response JSON on success, a structured error
    /// descriptor on failure
    pub output: String,
}

impl ToolResult {
    /// A success result wrapping the backend payload verbatim.
    pub fn ok(payload: &serde_json::Value) -> Self {
        Self {
            success: true,
            output: serde_json::to_string(payload).unwrap_or_default(),
        }
    }

    /// A failure result naming the operation and the reason, shaped so the
    /// model can explain the problem to the guest and recover.
    pub fn failed(operation: &str, reason: impl std::fmt::Display) -> Self {
        let descriptor = serde_json::json!({
            "error": { "operation": operation, "reason": reason.to_string() }
        });
        Self {
            success: false,
            output: descriptor.to_string(),
        }
    }
}

/// The core Tool trait.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique operation name (e.g., "list_restaurants").
    fn name(&self) -> &str;

    /// What this operation does — sent to the model, including any
    /// advisory policies the model is expected to enforce.
    fn description(&self) -> &str;

    /// JSON Schema describing this operation's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the operation with the given arguments.
    ///
    /// Backend failures are converted into failure [`ToolResult`]s by the
    /// implementation; an `Err` here means the call never reached the
    /// backend (unknown operation, bad arguments).
    async fn execute(&self, arguments: serde_json::Value)
        -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for the reasoner.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// The static registry of catalog operations.
///
/// The agent loop uses this to:
/// 1. Get operation definitions to send to the reasoner
/// 2. Look up and dispatch operations when the reasoner requests them
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register an operation. Replaces any existing entry with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get an operation by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All operation definitions (for the reasoner).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// Dispatch one invocation to its operation.
    pub async fn execute(&self, call: &ToolCall) -> std::result::Result<ToolResult, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::NotFound(call.name.clone()))?;
        tool.execute(call.arguments.clone()).await
    }

    /// List all registered operation names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidArguments {
                    tool_name: "echo".into(),
                    reason: "missing required field 'text'".into(),
                })?;
            Ok(ToolResult::ok(&serde_json::json!({ "text": text })))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn registry_execute_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello"}),
        };
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("hello"));
    }

    #[tokio::test]
    async fn registry_execute_missing_tool() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn missing_required_argument_is_invalid() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({}),
        };
        let err = registry.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn failure_result_names_the_operation() {
        let result = ToolResult::failed("cancel_reservation", "backend returned 404");
        assert!(!result.success);
        assert!(result.output.contains("cancel_reservation"));
        assert!(result.output.contains("404"));
    }
}
