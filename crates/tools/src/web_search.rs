//! Web search via the Tavily API.
//!
//! The one catalog entry that does not touch the hotel backend — used for
//! questions about the outside world (directions, events, weather).

use crate::args;
use async_trait::async_trait;
use maitred_core::error::ToolError;
use maitred_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use tracing::debug;

const TAVILY_URL: &str = "https://api.tavily.com";

pub struct WebSearchTool {
    api_key: String,
    max_results: u32,
    base_url: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(api_key: impl Into<String>, max_results: u32) -> Self {
        Self {
            api_key: api_key.into(),
            max_results,
            base_url: TAVILY_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the tool at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize, serde::Serialize)]
struct TavilyResult {
    title: String,
    url: String,
    content: String,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information outside the hotel's own systems: \
         local attractions, directions, events, weather. Returns result \
         titles, URLs and snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = args::require_str(&arguments, self.name(), "query")?;
        debug!(query = %query, "Web search");

        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": self.max_results,
        });

        let response = match self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Ok(ToolResult::failed(self.name(), e)),
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Ok(ToolResult::failed(
                self.name(),
                format!("search API returned status {status}"),
            ));
        }

        match response.json::<TavilyResponse>().await {
            Ok(parsed) => Ok(ToolResult::ok(
                &serde_json::to_value(parsed.results).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}
