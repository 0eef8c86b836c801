//! Value records owned by the hotel backend.
//!
//! These are flat serde records held only transiently by the agent: every
//! "update" is a full round trip through the connector, never an in-place
//! mutation.

use serde::{Deserialize, Serialize};

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of records across all pages
    pub count: u64,

    /// URL of the next page, if any
    pub next: Option<String>,

    /// URL of the previous page, if any
    pub previous: Option<String>,

    /// The records on this page
    pub results: Vec<T>,
}

/// A registered hotel guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRecord {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub room_number: Option<String>,
    pub special_requests: Option<String>,
}

/// Payload for creating or fully replacing a guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
    pub name: String,
    pub phone_number: String,
    pub room_number: Option<String>,
    pub special_requests: Option<String>,
}

/// A restaurant reservation. `client`, `restaurant`, and `meal` are ids
/// of the corresponding records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: i64,
    pub client: i64,
    pub restaurant: i64,
    /// Reservation date, YYYY-MM-DD
    pub date: String,
    pub meal: i64,
    pub number_of_guests: i64,
    pub special_requests: Option<String>,
}

/// Payload for creating or fully replacing a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub client: i64,
    pub restaurant: i64,
    pub date: String,
    pub meal: i64,
    pub number_of_guests: i64,
    pub special_requests: Option<String>,
}

/// Partial reservation update; only the provided fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

/// Filters for the reservation list endpoint.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub page: Option<u32>,
    pub client: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub meal: Option<i64>,
    pub restaurant: Option<i64>,
}

/// A meal sitting (breakfast, lunch, dinner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: i64,
    pub name: String,
}

/// A hotel restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub capacity: i64,
    pub opening_hours: String,
    pub location: String,
    pub is_active: bool,
}

/// A hotel spa. The spas endpoint returns a bare array, not a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub phone_number: String,
    pub email: String,
    pub opening_hours: String,
    pub created_at: String,
    pub updated_at: String,
}
