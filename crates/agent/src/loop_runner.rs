//! The agent orchestration loop.
//!
//! One call to [`AgentLoop::process`] is one guest turn: reason over the
//! transcript, execute whatever operations the model requests, fold the
//! results back in, and repeat until the model produces a final reply or
//! the iteration cap fires. The contract is total — every turn ends in
//! text — except when the reasoning capability itself is unreachable,
//! which surfaces as [`AgentError::Unavailable`].

use crate::prompt;
use maitred_core::error::{AgentError, ToolError};
use maitred_core::message::{Conversation, Message, MessageToolCall, Role};
use maitred_core::reasoner::{Reasoner, ReasonerRequest};
use maitred_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct AgentLoop {
    /// The language-model capability
    reasoner: Arc<dyn Reasoner>,

    /// The model to request
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// The operation catalog
    tools: Arc<ToolRegistry>,

    /// Maximum reason/invoke cycles per turn
    max_iterations: u32,

    /// `[ANGRY]` replies in a thread before the conversation is closed
    escalation_threshold: usize,

    /// Deadline for one reasoning call
    reason_timeout: Duration,

    /// Deadline for one operation dispatch
    tool_timeout: Duration,
}

impl AgentLoop {
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            reasoner,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            max_iterations: 8,
            escalation_threshold: 3,
            reason_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(20),
        }
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Set the maximum number of reason/invoke cycles per turn.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set how many `[ANGRY]` replies end the conversation.
    pub fn with_escalation_threshold(mut self, threshold: usize) -> Self {
        self.escalation_threshold = threshold;
        self
    }

    /// Set the deadline for one reasoning call.
    pub fn with_reason_timeout(mut self, timeout: Duration) -> Self {
        self.reason_timeout = timeout;
        self
    }

    /// Set the deadline for one operation dispatch.
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Run one guest turn over the conversation.
    ///
    /// Expects the latest user message to already be appended. Appends
    /// everything it produces (assistant messages, tool results) so
    /// subsequent turns see the full history.
    pub async fn process(
        &self,
        conversation: &mut Conversation,
    ) -> std::result::Result<String, AgentError> {
        info!(
            conversation_id = %conversation.id,
            messages = conversation.messages.len(),
            "Processing turn"
        );

        // The system instruction is always the first message of a thread.
        if conversation.messages.is_empty() || conversation.messages[0].role != Role::System {
            conversation
                .messages
                .insert(0, Message::system(prompt::system_prompt()));
        }

        // Escalation: past the threshold the turn ends with a closing
        // message, before any reasoning or operations.
        let angry = conversation.assistant_replies_with_prefix(prompt::ANGRY_PREFIX);
        if angry >= self.escalation_threshold {
            warn!(
                conversation_id = %conversation.id,
                angry_replies = angry,
                "Escalation threshold reached, closing conversation"
            );
            conversation.push(Message::assistant(prompt::ESCALATION_CLOSING));
            return Ok(prompt::ESCALATION_CLOSING.into());
        }

        let tool_definitions = self.tools.definitions();
        let mut iteration = 0;

        loop {
            iteration += 1;

            if iteration > self.max_iterations {
                warn!(
                    conversation_id = %conversation.id,
                    iterations = iteration,
                    "Iteration cap reached, synthesizing fallback reply"
                );
                break;
            }

            debug!(
                conversation_id = %conversation.id,
                iteration = iteration,
                "Reasoning step"
            );

            let request = ReasonerRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response =
                match tokio::time::timeout(self.reason_timeout, self.reasoner.complete(request))
                    .await
                {
                    Ok(Ok(response)) => response,
                    Ok(Err(e)) => return Err(AgentError::from(e)),
                    Err(_) => {
                        return Err(AgentError::Unavailable(format!(
                            "reasoning step timed out after {}s",
                            self.reason_timeout.as_secs()
                        )))
                    }
                };

            if response.is_final() {
                let reply = response.message.content.clone();
                conversation.push(response.message);
                return Ok(reply);
            }

            debug!(
                invocations = response.message.tool_calls.len(),
                "Dispatching requested operations"
            );

            let tool_calls = response.message.tool_calls.clone();
            conversation.push(response.message);

            // Dispatches are independent network calls and run
            // concurrently; results rejoin the transcript in the
            // original invocation order.
            let outputs =
                futures::future::join_all(tool_calls.iter().map(|tc| self.dispatch(tc))).await;

            for (tc, output) in tool_calls.iter().zip(outputs) {
                conversation.push(Message::tool_result(&tc.id, &output));
            }
        }

        conversation.push(Message::assistant(prompt::ITERATION_FALLBACK));
        Ok(prompt::ITERATION_FALLBACK.into())
    }

    /// Dispatch one invocation. Never fails — failures become
    /// observations the model re-reasons over.
    async fn dispatch(&self, tc: &MessageToolCall) -> String {
        let call = ToolCall {
            id: tc.id.clone(),
            name: tc.name.clone(),
            arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
        };

        let started = std::time::Instant::now();
        let outcome = tokio::time::timeout(self.tool_timeout, self.tools.execute(&call)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(result)) => {
                debug!(
                    operation = %tc.name,
                    success = result.success,
                    duration_ms,
                    "Operation completed"
                );
                result.output
            }
            Ok(Err(e)) => {
                warn!(operation = %tc.name, error = %e, duration_ms, "Operation rejected");
                format!("Error: {e}")
            }
            Err(_) => {
                let e = ToolError::Timeout {
                    tool_name: tc.name.clone(),
                    timeout_secs: self.tool_timeout.as_secs(),
                };
                warn!(operation = %tc.name, duration_ms, "Operation timed out");
                format!("Error: {e}")
            }
        }
    }
}
