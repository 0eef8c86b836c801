//! Mistral chat-completions reasoner.
//!
//! Speaks the OpenAI-compatible `/v1/chat/completions` dialect: tool
//! definitions go out as `{"type":"function","function":{...}}`, the
//! model answers with either assistant text or a `tool_calls` array.
//! Each request carries its own deadline; the agent loop usually fires
//! its shorter one first.

use async_trait::async_trait;
use maitred_core::error::ReasonerError;
use maitred_core::message::{Message, MessageToolCall, Role};
use maitred_core::reasoner::{
    Reasoner, ReasonerRequest, ReasonerResponse, ToolDefinition, Usage,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const MISTRAL_URL: &str = "https://api.mistral.ai/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Reasoner backed by the Mistral platform API.
pub struct MistralReasoner {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl MistralReasoner {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Convenience constructor pointing at the hosted Mistral endpoint.
    pub fn hosted(api_key: impl Into<String>) -> Self {
        Self::new(MISTRAL_URL, api_key)
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Convert domain messages to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::System => "system".into(),
                    Role::Tool => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
            })
            .collect()
    }

    /// Convert catalog definitions to the wire format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }
}

#[async_trait]
impl Reasoner for MistralReasoner {
    fn name(&self) -> &str {
        "mistral"
    }

    async fn complete(
        &self,
        request: ReasonerRequest,
    ) -> std::result::Result<ReasonerResponse, ReasonerError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
            body["tool_choice"] = serde_json::json!("auto");
        }

        debug!(model = %request.model, messages = request.messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReasonerError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    ReasonerError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ReasonerError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ReasonerError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Reasoner returned error");
            return Err(ReasonerError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ReasonerError::Api {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ReasonerError::Api {
                status_code: 200,
                message: "No choices in response".into(),
            })?;

        let tool_calls: Vec<MessageToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| MessageToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let mut message = Message::assistant(choice.message.content.unwrap_or_default());
        message.tool_calls = tool_calls;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ReasonerResponse {
            message,
            usage,
            model: api_response.model,
        })
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};

    #[test]
    fn hosted_constructor_points_at_mistral() {
        let reasoner = MistralReasoner::hosted("sk-test");
        assert_eq!(reasoner.name(), "mistral");
        assert!(reasoner.base_url.contains("api.mistral.ai"));
    }

    #[test]
    fn message_conversion_roles() {
        let messages = vec![
            Message::system("You are the hotel receptionist"),
            Message::user("A table for two, please"),
        ];
        let api_messages = MistralReasoner::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn message_conversion_with_tool_calls() {
        let mut msg = Message::assistant("");
        msg.tool_calls = vec![MessageToolCall {
            id: "call_1".into(),
            name: "list_restaurants".into(),
            arguments: r#"{"page":1}"#.into(),
        }];
        let api_msgs = MistralReasoner::to_api_messages(&[msg]);
        let tc = api_msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(tc.len(), 1);
        assert_eq!(tc[0].function.name, "list_restaurants");
        assert_eq!(tc[0].r#type, "function");
    }

    #[test]
    fn message_conversion_tool_result() {
        let msg = Message::tool_result("call_1", r#"{"count":2}"#);
        let api_msgs = MistralReasoner::to_api_messages(&[msg]);
        assert_eq!(api_msgs[0].role, "tool");
        assert_eq!(api_msgs[0].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn tool_definition_conversion() {
        let tools = vec![ToolDefinition {
            name: "list_spas".into(),
            description: "List the hotel's spas".into(),
            parameters: serde_json::json!({"type": "object", "properties": {}}),
        }];
        let api_tools = MistralReasoner::to_api_tools(&tools);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function.name, "list_spas");
        assert_eq!(api_tools[0].r#type, "function");
    }

    #[test]
    fn parse_final_reply() {
        let data = r#"{
            "model": "mistral-large-latest",
            "choices": [{"message": {"role": "assistant", "content": "Of course, right away."}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 8, "total_tokens": 128}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let msg = &parsed.choices[0].message;
        assert_eq!(msg.content.as_deref(), Some("Of course, right away."));
        assert!(msg.tool_calls.is_none());
        assert_eq!(parsed.usage.unwrap().total_tokens, 128);
    }

    #[test]
    fn parse_tool_call_reply() {
        let data = r#"{
            "model": "mistral-large-latest",
            "choices": [{"message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"id": "call_abc", "type": "function",
                    "function": {"name": "list_restaurants", "arguments": "{\"page\": 1}"}}]
            }}],
            "usage": null
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        let tcs = parsed.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(tcs.len(), 1);
        assert_eq!(tcs[0].function.name, "list_restaurants");
    }

    async fn stub_completions(reply: serde_json::Value) -> MistralReasoner {
        let router = Router::new().route(
            "/chat/completions",
            post(move |Json(_body): Json<serde_json::Value>| async move { Json(reply) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        MistralReasoner::new(format!("http://{addr}"), "sk-test")
    }

    #[tokio::test]
    async fn complete_returns_final_response() {
        let reasoner = stub_completions(serde_json::json!({
            "model": "mistral-large-latest",
            "choices": [{"message": {"role": "assistant", "content": "Welcome to the hotel!"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
        .await;

        let response = reasoner
            .complete(ReasonerRequest {
                model: "mistral-large-latest".into(),
                messages: vec![Message::user("Hello")],
                temperature: 0.7,
                max_tokens: None,
                tools: Vec::new(),
            })
            .await
            .unwrap();

        assert!(response.is_final());
        assert_eq!(response.message.content, "Welcome to the hotel!");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[tokio::test]
    async fn complete_surfaces_requested_operations() {
        let reasoner = stub_completions(serde_json::json!({
            "model": "mistral-large-latest",
            "choices": [{"message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"id": "call_1", "type": "function",
                    "function": {"name": "list_meals", "arguments": "{}"}}]
            }}]
        }))
        .await;

        let response = reasoner
            .complete(ReasonerRequest {
                model: "mistral-large-latest".into(),
                messages: vec![Message::user("When is dinner served?")],
                temperature: 0.7,
                max_tokens: None,
                tools: Vec::new(),
            })
            .await
            .unwrap();

        assert!(!response.is_final());
        assert_eq!(response.message.tool_calls[0].name, "list_meals");
    }

    #[tokio::test]
    async fn timeout_error_names_the_configured_deadline() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "too late"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let reasoner = MistralReasoner::new(format!("http://{addr}"), "sk-test")
            .with_timeout(Duration::from_secs(1));

        let err = reasoner
            .complete(ReasonerRequest {
                model: "mistral-large-latest".into(),
                messages: vec![Message::user("Hello")],
                temperature: 0.7,
                max_tokens: None,
                tools: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ReasonerError::Timeout { timeout_secs: 1 }));
        assert!(err.to_string().contains("1s"));
    }

    #[tokio::test]
    async fn auth_failure_maps_to_authentication_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (axum::http::StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let reasoner = MistralReasoner::new(format!("http://{addr}"), "bad");

        let err = reasoner
            .complete(ReasonerRequest {
                model: "mistral-large-latest".into(),
                messages: vec![Message::user("Hello")],
                temperature: 0.7,
                max_tokens: None,
                tools: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ReasonerError::AuthenticationFailed(_)));
    }
}
