//! Free-text medical consultation.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use doctor_common::{ConsultationRequest, ConsultationResponse};

use crate::error::{ApiError, Result};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/consultation", post(consultation))
}

/// POST /consultation
///
/// Unlike the symptom and medication endpoints, this one probes the backend
/// first and answers 503 when it is down.
async fn consultation(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ConsultationRequest>, JsonRejection>,
) -> Result<Json<ConsultationResponse>> {
    let Json(request) = payload?;
    let message = request.message.unwrap_or_default();

    if message.is_empty() {
        return Err(ApiError::validation("Message is required"));
    }

    if !state.assistant.check_availability().await {
        return Err(ApiError::BackendUnavailable);
    }

    let result = state.assistant.generate(&message).await;

    Ok(Json(ConsultationResponse {
        response: result.text,
        model: result.model,
        timestamp: result.timestamp,
    }))
}
