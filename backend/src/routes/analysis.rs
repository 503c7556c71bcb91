//! Symptom analysis and medication interaction checks.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use doctor_common::{
    MedicationInteractionResponse, MedicationsRequest, SymptomAnalysisResponse, SymptomsRequest,
};

use crate::assistant::{medications_prompt, symptoms_prompt};
use crate::error::{ApiError, Result};
use crate::state::AppState;

const MIN_MEDICATIONS: usize = 2;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze-symptoms", post(analyze_symptoms))
        .route("/medication-interaction", post(medication_interaction))
}

/// POST /analyze-symptoms
async fn analyze_symptoms(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SymptomsRequest>, JsonRejection>,
) -> Result<Json<SymptomAnalysisResponse>> {
    let Json(request) = payload?;
    let symptoms = request.symptoms.unwrap_or_default();

    if symptoms.is_empty() {
        return Err(ApiError::validation("Symptoms list is required"));
    }

    let result = state
        .assistant
        .generate(&symptoms_prompt(&symptoms))
        .await;

    Ok(Json(SymptomAnalysisResponse {
        response: result.text,
        symptoms,
        timestamp: result.timestamp,
    }))
}

/// POST /medication-interaction
async fn medication_interaction(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MedicationsRequest>, JsonRejection>,
) -> Result<Json<MedicationInteractionResponse>> {
    let Json(request) = payload?;
    let medications = request.medications.unwrap_or_default();

    if medications.len() < MIN_MEDICATIONS {
        return Err(ApiError::validation("At least two medications are required"));
    }

    let result = state
        .assistant
        .generate(&medications_prompt(&medications))
        .await;

    Ok(Json(MedicationInteractionResponse {
        response: result.text,
        medications,
        timestamp: result.timestamp,
    }))
}
