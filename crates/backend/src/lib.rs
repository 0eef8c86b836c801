//! Typed REST connector for the hotel backend.
//!
//! Thin request/response mapper over reqwest: base URL + token header,
//! pagination envelopes, and the DELETE-204 mapping. The connector raises
//! [`BackendError`] on any non-2xx response; retry policy, if ever added,
//! belongs here — the operation catalog above performs none.

pub mod records;

use maitred_core::error::BackendError;
use records::*;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

/// The canonical payload a DELETE 204 is mapped to.
pub fn deleted_payload() -> serde_json::Value {
    serde_json::json!({ "message": "Resource deleted successfully" })
}

/// Client for the hotel REST API.
pub struct HotelApi {
    base_url: String,
    api_token: Option<String>,
    client: reqwest::Client,
}

impl HotelApi {
    /// Create a connector for `base_url` (no trailing slash) with an
    /// optional `Authorization: Token <key>` credential.
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            client,
        })
    }

    // --- Guests ---

    pub async fn list_guests(
        &self,
        page: Option<u32>,
        search: Option<&str>,
    ) -> Result<Page<GuestRecord>, BackendError> {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        self.request(Method::GET, "clients", &query, None).await
    }

    pub async fn get_guest(&self, id: i64) -> Result<GuestRecord, BackendError> {
        self.request(Method::GET, &format!("clients/{id}"), &[], None)
            .await
    }

    pub async fn create_guest(&self, guest: &NewGuest) -> Result<GuestRecord, BackendError> {
        let body = serde_json::to_value(guest).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.request(Method::POST, "clients/", &[], Some(body)).await
    }

    pub async fn update_guest(
        &self,
        id: i64,
        guest: &NewGuest,
    ) -> Result<GuestRecord, BackendError> {
        let body = serde_json::to_value(guest).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.request(Method::PUT, &format!("clients/{id}/"), &[], Some(body))
            .await
    }

    pub async fn delete_guest(&self, id: i64) -> Result<serde_json::Value, BackendError> {
        self.delete(&format!("clients/{id}/")).await
    }

    // --- Reservations ---

    pub async fn list_reservations(
        &self,
        filter: &ReservationFilter,
    ) -> Result<Page<ReservationRecord>, BackendError> {
        let mut query = Vec::new();
        if let Some(page) = filter.page {
            query.push(("page", page.to_string()));
        }
        if let Some(client) = filter.client {
            query.push(("client", client.to_string()));
        }
        if let Some(ref from) = filter.date_from {
            query.push(("date_from", from.clone()));
        }
        if let Some(ref to) = filter.date_to {
            query.push(("date_to", to.clone()));
        }
        if let Some(meal) = filter.meal {
            query.push(("meal", meal.to_string()));
        }
        if let Some(restaurant) = filter.restaurant {
            query.push(("restaurant", restaurant.to_string()));
        }
        self.request(Method::GET, "reservations", &query, None).await
    }

    pub async fn get_reservation(&self, id: i64) -> Result<ReservationRecord, BackendError> {
        self.request(Method::GET, &format!("reservations/{id}"), &[], None)
            .await
    }

    pub async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<ReservationRecord, BackendError> {
        let body =
            serde_json::to_value(reservation).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.request(Method::POST, "reservations/", &[], Some(body))
            .await
    }

    pub async fn update_reservation(
        &self,
        id: i64,
        reservation: &NewReservation,
    ) -> Result<ReservationRecord, BackendError> {
        let body =
            serde_json::to_value(reservation).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.request(Method::PUT, &format!("reservations/{id}/"), &[], Some(body))
            .await
    }

    pub async fn patch_reservation(
        &self,
        id: i64,
        patch: &ReservationPatch,
    ) -> Result<ReservationRecord, BackendError> {
        let body = serde_json::to_value(patch).map_err(|e| BackendError::Decode(e.to_string()))?;
        self.request(Method::PATCH, &format!("reservations/{id}/"), &[], Some(body))
            .await
    }

    pub async fn delete_reservation(&self, id: i64) -> Result<serde_json::Value, BackendError> {
        self.delete(&format!("reservations/{id}/")).await
    }

    // --- Listings ---

    pub async fn list_meals(&self) -> Result<Page<MealRecord>, BackendError> {
        self.request(Method::GET, "meals", &[], None).await
    }

    pub async fn list_restaurants(
        &self,
        page: u32,
    ) -> Result<Page<RestaurantRecord>, BackendError> {
        let query = [("page", page.to_string())];
        self.request(Method::GET, "restaurants", &query, None).await
    }

    pub async fn list_spas(&self) -> Result<Vec<SpaRecord>, BackendError> {
        self.request(Method::GET, "spas", &[], None).await
    }

    // --- Internals ---

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, BackendError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(method = %method, path, "Hotel API request");

        let mut builder = self.client.request(method, &url);
        if let Some(ref token) = self.api_token {
            builder = builder.header("Authorization", format!("Token {token}"));
        }
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(e.to_string())
            } else {
                BackendError::Network(e.to_string())
            }
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, BackendError> {
        let response = self.send(method, path, query, body).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// DELETE with the 204 mapping: an empty success body is a successful
    /// deletion, not an error.
    async fn delete(&self, path: &str) -> Result<serde_json::Value, BackendError> {
        let response = self.send(Method::DELETE, path, &[], None).await?;
        let status = response.status();

        if status.as_u16() == 204 {
            return Ok(deleted_payload());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use axum::{Json, Router};
    use std::time::Duration;

    /// Spin up a stub hotel API on an ephemeral port and return a connector
    /// pointed at it.
    async fn stub_backend(router: Router) -> HotelApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        HotelApi::new(
            format!("http://{addr}"),
            Some("test-token".into()),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_restaurants_page() {
        let router = Router::new().route(
            "/restaurants",
            get(|| async {
                Json(serde_json::json!({
                    "count": 2, "next": null, "previous": null,
                    "results": [
                        {"id": 1, "name": "Le Jardin", "description": "Garden dining",
                         "capacity": 40, "opening_hours": "07:00-23:00",
                         "location": "Ground floor", "is_active": true},
                        {"id": 2, "name": "The Grill", "description": "Steakhouse",
                         "capacity": 25, "opening_hours": "16:00-23:00",
                         "location": "Rooftop", "is_active": true}
                    ]
                }))
            }),
        );
        let api = stub_backend(router).await;

        let page = api.list_restaurants(1).await.unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.results[0].name, "Le Jardin");
        assert_eq!(page.results[1].capacity, 25);
    }

    #[tokio::test]
    async fn delete_204_maps_to_deleted_payload() {
        let router = Router::new().route(
            "/reservations/{id}/",
            delete(|| async { StatusCode::NO_CONTENT }),
        );
        let api = stub_backend(router).await;

        let payload = api.delete_reservation(9).await.unwrap();
        assert_eq!(payload["message"], "Resource deleted successfully");
    }

    #[tokio::test]
    async fn non_2xx_becomes_api_error() {
        let router = Router::new().route(
            "/clients/{id}",
            get(|| async { (StatusCode::NOT_FOUND, "Not found.") }),
        );
        let api = stub_backend(router).await;

        let err = api.get_guest(404).await.unwrap_err();
        match err {
            BackendError::Api { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Not found"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_is_idempotent_against_unchanged_backend() {
        let router = Router::new().route(
            "/clients/{id}",
            get(|| async {
                Json(serde_json::json!({
                    "id": 7, "name": "Ada Lovelace", "phone_number": "0611223344",
                    "room_number": "212", "special_requests": null
                }))
            }),
        );
        let api = stub_backend(router).await;

        let first = api.get_guest(7).await.unwrap();
        let second = api.get_guest(7).await.unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn spas_decode_from_bare_array() {
        let router = Router::new().route(
            "/spas",
            get(|| async {
                Json(serde_json::json!([
                    {"id": 1, "name": "Serenity", "description": "Full-service spa",
                     "location": "Level -1", "phone_number": "0123456789",
                     "email": "spa@hotel.example", "opening_hours": "09:00-21:00",
                     "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"}
                ]))
            }),
        );
        let api = stub_backend(router).await;

        let spas = api.list_spas().await.unwrap();
        assert_eq!(spas.len(), 1);
        assert_eq!(spas[0].name, "Serenity");
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Port 9 (discard) is a safe never-listening target.
        let api = HotelApi::new("http://127.0.0.1:9", None, Duration::from_millis(500)).unwrap();
        let err = api.list_meals().await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Network(_) | BackendError::Timeout(_)
        ));
    }
}
