//! The Operation Catalog: hotel backend operations exposed as agent tools.
//!
//! Each tool validates its arguments against its schema, calls exactly one
//! [`HotelApi`] method, and converts any backend failure into a failure
//! `ToolResult` naming the operation — never an error the caller sees.
//! No tool retries; retry policy belongs to the connector.

pub mod args;
pub mod guests;
pub mod listings;
pub mod reservations;
pub mod web_search;

use maitred_backend::HotelApi;
use maitred_core::tool::ToolRegistry;
use std::sync::Arc;

/// Build the full catalog: guest CRUD, reservation management, listings,
/// and (when a Tavily key is configured) web search.
pub fn hotel_registry(
    api: Arc<HotelApi>,
    tavily_api_key: Option<String>,
    max_search_results: u32,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(guests::ListGuestsTool::new(api.clone())));
    registry.register(Box::new(guests::GetGuestTool::new(api.clone())));
    registry.register(Box::new(guests::CreateGuestTool::new(api.clone())));
    registry.register(Box::new(guests::UpdateGuestTool::new(api.clone())));
    registry.register(Box::new(guests::DeleteGuestTool::new(api.clone())));

    registry.register(Box::new(reservations::ListReservationsTool::new(api.clone())));
    registry.register(Box::new(reservations::GetReservationTool::new(api.clone())));
    registry.register(Box::new(reservations::CreateReservationTool::new(api.clone())));
    registry.register(Box::new(reservations::UpdateReservationTool::new(api.clone())));
    registry.register(Box::new(reservations::AmendReservationTool::new(api.clone())));
    registry.register(Box::new(reservations::CancelReservationTool::new(api.clone())));

    registry.register(Box::new(listings::ListMealsTool::new(api.clone())));
    registry.register(Box::new(listings::ListRestaurantsTool::new(api.clone())));
    registry.register(Box::new(listings::ListSpasTool::new(api)));

    if let Some(key) = tavily_api_key {
        registry.register(Box::new(web_search::WebSearchTool::new(
            key,
            max_search_results,
        )));
    }

    registry
}
