//! Read-only listing operations: meals, restaurants, spas.

use crate::args;
use async_trait::async_trait;
use maitred_backend::HotelApi;
use maitred_core::error::ToolError;
use maitred_core::tool::{Tool, ToolResult};
use std::sync::Arc;

pub struct ListMealsTool {
    api: Arc<HotelApi>,
}

impl ListMealsTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListMealsTool {
    fn name(&self) -> &str {
        "list_meals"
    }

    fn description(&self) -> &str {
        "List the meal sittings the hotel serves (breakfast, lunch, dinner) \
         with their ids. Reservation booking needs a meal id from this list."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        match self.api.list_meals().await {
            Ok(page) => Ok(ToolResult::ok(
                &serde_json::to_value(page).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct ListRestaurantsTool {
    api: Arc<HotelApi>,
}

impl ListRestaurantsTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListRestaurantsTool {
    fn name(&self) -> &str {
        "list_restaurants"
    }

    fn description(&self) -> &str {
        "List the hotel's restaurants with name, description, capacity, \
         opening hours and location. Paginated; page defaults to 1."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "page": {
                    "type": "integer",
                    "description": "Page number of the results, starting from 1",
                    "default": 1
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let page = args::optional_u32(&arguments, "page").unwrap_or(1);

        match self.api.list_restaurants(page).await {
            Ok(page) => Ok(ToolResult::ok(
                &serde_json::to_value(page).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct ListSpasTool {
    api: Arc<HotelApi>,
}

impl ListSpasTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListSpasTool {
    fn name(&self) -> &str {
        "list_spas"
    }

    fn description(&self) -> &str {
        "List the hotel's spas with location, contact details and opening hours."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        match self.api.list_spas().await {
            Ok(spas) => Ok(ToolResult::ok(
                &serde_json::to_value(spas).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}
