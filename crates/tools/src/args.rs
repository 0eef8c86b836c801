//! Argument extraction helpers shared by the catalog tools.
//!
//! Missing or mistyped required fields become `ToolError::InvalidArguments`,
//! which the agent loop folds back into the transcript so the model can ask
//! the guest for the missing detail on the next turn.

use maitred_core::error::ToolError;
use serde_json::Value;

pub fn require_str(args: &Value, tool: &str, field: &str) -> Result<String, ToolError> {
    args[field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| missing(tool, field, "string"))
}

pub fn require_i64(args: &Value, tool: &str, field: &str) -> Result<i64, ToolError> {
    args[field].as_i64().ok_or_else(|| missing(tool, field, "integer"))
}

pub fn optional_str(args: &Value, field: &str) -> Option<String> {
    args[field].as_str().map(str::to_string)
}

pub fn optional_i64(args: &Value, field: &str) -> Option<i64> {
    args[field].as_i64()
}

pub fn optional_u32(args: &Value, field: &str) -> Option<u32> {
    args[field].as_u64().and_then(|v| u32::try_from(v).ok())
}

fn missing(tool: &str, field: &str, expected: &str) -> ToolError {
    ToolError::InvalidArguments {
        tool_name: tool.to_string(),
        reason: format!("missing or invalid required field '{field}' (expected {expected})"),
    }
}
