//! Guest record operations (the backend's `clients` resource).

use crate::args;
use async_trait::async_trait;
use maitred_backend::records::NewGuest;
use maitred_backend::HotelApi;
use maitred_core::error::ToolError;
use maitred_core::tool::{Tool, ToolResult};
use std::sync::Arc;

pub struct ListGuestsTool {
    api: Arc<HotelApi>,
}

impl ListGuestsTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListGuestsTool {
    fn name(&self) -> &str {
        "list_guests"
    }

    fn description(&self) -> &str {
        "Search the hotel's guest records. Returns a paginated list of guests \
         with name, phone number, room number and special requests. Use the \
         search parameter to match a name or phone number."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "page": {
                    "type": "integer",
                    "description": "Page number of the results, starting from 1"
                },
                "search": {
                    "type": "string",
                    "description": "Free-text filter matched against name and phone number"
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let page = args::optional_u32(&arguments, "page");
        let search = args::optional_str(&arguments, "search");

        match self.api.list_guests(page, search.as_deref()).await {
            Ok(page) => Ok(ToolResult::ok(
                &serde_json::to_value(page).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct GetGuestTool {
    api: Arc<HotelApi>,
}

impl GetGuestTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetGuestTool {
    fn name(&self) -> &str {
        "get_guest"
    }

    fn description(&self) -> &str {
        "Fetch one guest record by its unique id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "guest_id": {
                    "type": "integer",
                    "description": "The guest's unique identifier"
                }
            },
            "required": ["guest_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "guest_id")?;

        match self.api.get_guest(id).await {
            Ok(guest) => Ok(ToolResult::ok(
                &serde_json::to_value(guest).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct CreateGuestTool {
    api: Arc<HotelApi>,
}

impl CreateGuestTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for CreateGuestTool {
    fn name(&self) -> &str {
        "create_guest"
    }

    fn description(&self) -> &str {
        "Register a new guest. Name and phone number are required — if the \
         guest has not given them yet, ask before calling this."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "The guest's full name" },
                "phone_number": { "type": "string", "description": "The guest's phone number" },
                "room_number": { "type": "string", "description": "The guest's room number, if staying at the hotel" },
                "special_requests": { "type": "string", "description": "Any standing special requests" }
            },
            "required": ["name", "phone_number"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let guest = NewGuest {
            name: args::require_str(&arguments, self.name(), "name")?,
            phone_number: args::require_str(&arguments, self.name(), "phone_number")?,
            room_number: args::optional_str(&arguments, "room_number"),
            special_requests: args::optional_str(&arguments, "special_requests"),
        };

        match self.api.create_guest(&guest).await {
            Ok(created) => Ok(ToolResult::ok(
                &serde_json::to_value(created).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct UpdateGuestTool {
    api: Arc<HotelApi>,
}

impl UpdateGuestTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for UpdateGuestTool {
    fn name(&self) -> &str {
        "update_guest"
    }

    fn description(&self) -> &str {
        "Replace an existing guest record. All fields are written; fetch the \
         current record first and carry over anything the guest is not changing."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "guest_id": { "type": "integer", "description": "The guest's unique identifier" },
                "name": { "type": "string", "description": "The guest's full name" },
                "phone_number": { "type": "string", "description": "The guest's phone number" },
                "room_number": { "type": "string", "description": "The guest's room number" },
                "special_requests": { "type": "string", "description": "Any standing special requests" }
            },
            "required": ["guest_id", "name", "phone_number"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "guest_id")?;
        let guest = NewGuest {
            name: args::require_str(&arguments, self.name(), "name")?,
            phone_number: args::require_str(&arguments, self.name(), "phone_number")?,
            room_number: args::optional_str(&arguments, "room_number"),
            special_requests: args::optional_str(&arguments, "special_requests"),
        };

        match self.api.update_guest(id, &guest).await {
            Ok(updated) => Ok(ToolResult::ok(
                &serde_json::to_value(updated).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct DeleteGuestTool {
    api: Arc<HotelApi>,
}

impl DeleteGuestTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for DeleteGuestTool {
    fn name(&self) -> &str {
        "delete_guest"
    }

    fn description(&self) -> &str {
        "Delete a guest record by id. Irreversible — confirm with the guest first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "guest_id": {
                    "type": "integer",
                    "description": "The guest's unique identifier"
                }
            },
            "required": ["guest_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "guest_id")?;

        match self.api.delete_guest(id).await {
            Ok(payload) => Ok(ToolResult::ok(&payload)),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{delete, post};
    use axum::{Json, Router};
    use std::time::Duration;

    async fn stub_api(router: Router) -> Arc<HotelApi> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Arc::new(
            HotelApi::new(format!("http://{addr}"), None, Duration::from_secs(2)).unwrap(),
        )
    }

    #[tokio::test]
    async fn create_guest_missing_phone_is_invalid_arguments() {
        let tool = CreateGuestTool::new(stub_api(Router::new()).await);
        let err = tool
            .execute(serde_json::json!({"name": "Ada"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn create_guest_forwards_backend_payload() {
        let router = Router::new().route(
            "/clients/",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!({
                    "id": 42,
                    "name": body["name"],
                    "phone_number": body["phone_number"],
                    "room_number": null,
                    "special_requests": null
                }))
            }),
        );
        let tool = CreateGuestTool::new(stub_api(router).await);

        let result = tool
            .execute(serde_json::json!({"name": "Ada", "phone_number": "0611223344"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("\"id\":42"));
    }

    #[tokio::test]
    async fn delete_guest_204_yields_deleted_message() {
        let router = Router::new().route(
            "/clients/{id}/",
            delete(|| async { StatusCode::NO_CONTENT }),
        );
        let tool = DeleteGuestTool::new(stub_api(router).await);

        let result = tool
            .execute(serde_json::json!({"guest_id": 42}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("Resource deleted successfully"));
    }

    #[tokio::test]
    async fn backend_failure_becomes_failure_result() {
        // No route — the stub answers 404 for everything.
        let tool = GetGuestTool::new(stub_api(Router::new()).await);

        let result = tool
            .execute(serde_json::json!({"guest_id": 1}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.contains("get_guest"));
    }
}
