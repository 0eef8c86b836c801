//! Reservation operations.
//!
//! The meal-window, capacity, and uniqueness constraints are documented in
//! the tool descriptions and enforced only by the model's reasoning — the
//! backend and the loop do not validate them.

use crate::args;
use async_trait::async_trait;
use maitred_backend::records::{NewReservation, ReservationFilter, ReservationPatch};
use maitred_backend::HotelApi;
use maitred_core::error::ToolError;
use maitred_core::tool::{Tool, ToolResult};
use std::sync::Arc;

pub struct ListReservationsTool {
    api: Arc<HotelApi>,
}

impl ListReservationsTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for ListReservationsTool {
    fn name(&self) -> &str {
        "list_reservations"
    }

    fn description(&self) -> &str {
        "List restaurant reservations, optionally filtered by guest, date \
         range, meal or restaurant. Returns a paginated list."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "page": { "type": "integer", "description": "Page number, starting from 1" },
                "client_id": { "type": "integer", "description": "Filter by guest id" },
                "date_from": { "type": "string", "description": "Earliest date, YYYY-MM-DD" },
                "date_to": { "type": "string", "description": "Latest date, YYYY-MM-DD" },
                "meal_id": { "type": "integer", "description": "Filter by meal id" },
                "restaurant_id": { "type": "integer", "description": "Filter by restaurant id" }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let filter = ReservationFilter {
            page: args::optional_u32(&arguments, "page"),
            client: args::optional_i64(&arguments, "client_id"),
            date_from: args::optional_str(&arguments, "date_from"),
            date_to: args::optional_str(&arguments, "date_to"),
            meal: args::optional_i64(&arguments, "meal_id"),
            restaurant: args::optional_i64(&arguments, "restaurant_id"),
        };

        match self.api.list_reservations(&filter).await {
            Ok(page) => Ok(ToolResult::ok(
                &serde_json::to_value(page).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct GetReservationTool {
    api: Arc<HotelApi>,
}

impl GetReservationTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for GetReservationTool {
    fn name(&self) -> &str {
        "get_reservation"
    }

    fn description(&self) -> &str {
        "Fetch one reservation by its unique id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservation_id": {
                    "type": "integer",
                    "description": "The reservation's unique identifier"
                }
            },
            "required": ["reservation_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "reservation_id")?;

        match self.api.get_reservation(id).await {
            Ok(reservation) => Ok(ToolResult::ok(
                &serde_json::to_value(reservation).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct CreateReservationTool {
    api: Arc<HotelApi>,
}

impl CreateReservationTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for CreateReservationTool {
    fn name(&self) -> &str {
        "create_reservation"
    }

    fn description(&self) -> &str {
        "Book a restaurant table for a registered guest. Policies to respect \
         before booking: meal sittings are served only within their windows \
         (breakfast 07:00-10:00, lunch 11:00-15:00, dinner 16:00-23:00); the \
         party size must fit within the restaurant's stated capacity; and a \
         guest may hold at most one reservation per restaurant, date and meal \
         — check existing reservations before creating a duplicate."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "client_id": { "type": "integer", "description": "Id of the guest making the reservation" },
                "restaurant_id": { "type": "integer", "description": "Id of the restaurant" },
                "date": { "type": "string", "description": "Reservation date, YYYY-MM-DD" },
                "meal_id": { "type": "integer", "description": "Id of the meal sitting" },
                "number_of_guests": { "type": "integer", "description": "Party size" },
                "special_requests": { "type": "string", "description": "Special requests for this reservation" }
            },
            "required": ["client_id", "restaurant_id", "date", "meal_id", "number_of_guests"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let reservation = NewReservation {
            client: args::require_i64(&arguments, self.name(), "client_id")?,
            restaurant: args::require_i64(&arguments, self.name(), "restaurant_id")?,
            date: args::require_str(&arguments, self.name(), "date")?,
            meal: args::require_i64(&arguments, self.name(), "meal_id")?,
            number_of_guests: args::require_i64(&arguments, self.name(), "number_of_guests")?,
            special_requests: args::optional_str(&arguments, "special_requests"),
        };

        match self.api.create_reservation(&reservation).await {
            Ok(created) => Ok(ToolResult::ok(
                &serde_json::to_value(created).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct UpdateReservationTool {
    api: Arc<HotelApi>,
}

impl UpdateReservationTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for UpdateReservationTool {
    fn name(&self) -> &str {
        "update_reservation"
    }

    fn description(&self) -> &str {
        "Replace an existing reservation. All fields are written; the same \
         meal-window, capacity and uniqueness policies as create_reservation \
         apply."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservation_id": { "type": "integer", "description": "The reservation's unique identifier" },
                "client_id": { "type": "integer", "description": "Id of the guest making the reservation" },
                "restaurant_id": { "type": "integer", "description": "Id of the restaurant" },
                "date": { "type": "string", "description": "Reservation date, YYYY-MM-DD" },
                "meal_id": { "type": "integer", "description": "Id of the meal sitting" },
                "number_of_guests": { "type": "integer", "description": "Party size" },
                "special_requests": { "type": "string", "description": "Special requests for this reservation" }
            },
            "required": ["reservation_id", "client_id", "restaurant_id", "date", "meal_id", "number_of_guests"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "reservation_id")?;
        let reservation = NewReservation {
            client: args::require_i64(&arguments, self.name(), "client_id")?,
            restaurant: args::require_i64(&arguments, self.name(), "restaurant_id")?,
            date: args::require_str(&arguments, self.name(), "date")?,
            meal: args::require_i64(&arguments, self.name(), "meal_id")?,
            number_of_guests: args::require_i64(&arguments, self.name(), "number_of_guests")?,
            special_requests: args::optional_str(&arguments, "special_requests"),
        };

        match self.api.update_reservation(id, &reservation).await {
            Ok(updated) => Ok(ToolResult::ok(
                &serde_json::to_value(updated).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct AmendReservationTool {
    api: Arc<HotelApi>,
}

impl AmendReservationTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for AmendReservationTool {
    fn name(&self) -> &str {
        "amend_reservation"
    }

    fn description(&self) -> &str {
        "Partially update a reservation — only the fields provided are \
         changed. Prefer this over update_reservation when the guest is \
         changing a single detail such as the party size or the date."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservation_id": { "type": "integer", "description": "The reservation's unique identifier" },
                "client_id": { "type": "integer", "description": "New guest id" },
                "restaurant_id": { "type": "integer", "description": "New restaurant id" },
                "date": { "type": "string", "description": "New date, YYYY-MM-DD" },
                "meal_id": { "type": "integer", "description": "New meal id" },
                "number_of_guests": { "type": "integer", "description": "New party size" },
                "special_requests": { "type": "string", "description": "New special requests" }
            },
            "required": ["reservation_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "reservation_id")?;
        let patch = ReservationPatch {
            client: args::optional_i64(&arguments, "client_id"),
            restaurant: args::optional_i64(&arguments, "restaurant_id"),
            date: args::optional_str(&arguments, "date"),
            meal: args::optional_i64(&arguments, "meal_id"),
            number_of_guests: args::optional_i64(&arguments, "number_of_guests"),
            special_requests: args::optional_str(&arguments, "special_requests"),
        };

        match self.api.patch_reservation(id, &patch).await {
            Ok(updated) => Ok(ToolResult::ok(
                &serde_json::to_value(updated).unwrap_or_default(),
            )),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}

pub struct CancelReservationTool {
    api: Arc<HotelApi>,
}

impl CancelReservationTool {
    pub fn new(api: Arc<HotelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for CancelReservationTool {
    fn name(&self) -> &str {
        "cancel_reservation"
    }

    fn description(&self) -> &str {
        "Cancel (delete) a reservation by id. Irreversible — confirm with \
         the guest first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reservation_id": {
                    "type": "integer",
                    "description": "The reservation's unique identifier"
                }
            },
            "required": ["reservation_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::require_i64(&arguments, self.name(), "reservation_id")?;

        match self.api.delete_reservation(id).await {
            Ok(payload) => Ok(ToolResult::ok(&payload)),
            Err(e) => Ok(ToolResult::failed(self.name(), e)),
        }
    }
}
