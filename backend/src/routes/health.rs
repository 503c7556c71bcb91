//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use doctor_common::{unix_timestamp, HealthResponse, HealthStatus};

use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// GET /health - Always 200; the body reports backend reachability.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let available = state.assistant.check_availability().await;

    Json(HealthResponse {
        status: HealthStatus::from_backend(available),
        ollama_available: available,
        timestamp: unix_timestamp(),
    })
}
