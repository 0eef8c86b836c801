//! HTTP entry adapter for the Maitred receptionist.
//!
//! A deliberately small surface: `GET /receptionist` takes the guest's
//! message (and optionally a thread id) as query parameters and returns
//! the receptionist's reply as plain text, plus a health check and the
//! embedded chat page. Built on Axum.

pub mod frontend;

use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use maitred_agent::{AgentLoop, Concierge};
use maitred_backend::HotelApi;
use maitred_core::error::AgentError;
use maitred_reasoner::MistralReasoner;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub concierge: Arc<Concierge>,

    /// Thread id used when the caller doesn't supply one. A single-kiosk
    /// deployment gets one shared conversation, which is the intended use.
    pub default_thread: String,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/receptionist", get(receptionist_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: maitred_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let concierge = build_concierge(&config)?;

    let state = Arc::new(GatewayState {
        concierge,
        default_thread: config.agent.default_thread.clone(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the full stack from configuration: backend connector, operation
/// catalog, reasoner, agent loop, sessions.
pub fn build_concierge(
    config: &maitred_config::AppConfig,
) -> Result<Arc<Concierge>, Box<dyn std::error::Error>> {
    let api_key = config
        .reasoner
        .api_key
        .clone()
        .ok_or("No reasoner API key configured — set MISTRAL_API_KEY")?;

    let api = Arc::new(HotelApi::new(
        config.hotel.api_url.clone(),
        config.hotel.api_token.clone(),
        Duration::from_secs(config.hotel.timeout_secs),
    )?);

    let tools = maitred_tools::hotel_registry(
        api,
        config.search.api_key.clone(),
        config.search.max_results,
    );

    let reasoner = Arc::new(MistralReasoner::new(
        config.reasoner.base_url.clone(),
        api_key,
    ));

    let agent = AgentLoop::new(
        reasoner,
        &config.reasoner.model,
        config.reasoner.temperature,
        Arc::new(tools),
    )
    .with_max_tokens(config.reasoner.max_tokens)
    .with_max_iterations(config.agent.max_iterations)
    .with_escalation_threshold(config.agent.escalation_threshold)
    .with_reason_timeout(Duration::from_secs(config.agent.reason_timeout_secs))
    .with_tool_timeout(Duration::from_secs(config.agent.tool_timeout_secs));

    Ok(Arc::new(Concierge::new(agent)))
}

// --- Handlers ---

#[derive(Debug, Deserialize)]
struct ReceptionistParams {
    message: Option<String>,
    thread_id: Option<String>,
}

/// `GET /receptionist?message=...&thread_id=...` → the reply, text/plain.
///
/// A missing message is the caller's mistake (400). The only hard failure
/// is the reasoning capability being unreachable (503); everything else
/// comes back as conversational text.
async fn receptionist_handler(
    State(state): State<SharedState>,
    Query(params): Query<ReceptionistParams>,
) -> Result<String, (StatusCode, String)> {
    let message = match params.message.as_deref() {
        Some(m) if !m.trim().is_empty() => m,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "missing required query parameter 'message'".into(),
            ))
        }
    };
    let thread_id = params.thread_id.as_deref().unwrap_or(&state.default_thread);

    info!(thread_id, message_len = message.len(), "Guest message received");

    match state.concierge.handle(thread_id, message).await {
        Ok(reply) => Ok(reply),
        Err(e @ AgentError::Unavailable(_)) => {
            error!(error = %e, "Receptionist unavailable");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "The receptionist is unavailable right now, please try again shortly.".into(),
            ))
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
