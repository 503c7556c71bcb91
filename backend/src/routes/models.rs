//! Model listing and selection.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use doctor_common::{ModelsResponse, SelectModelResponse};

use crate::state::AppState;

pub const MODEL_NOT_AVAILABLE_MESSAGE: &str = "Model not available";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/models", get(list_models))
        .route("/models/:name", post(select_model))
}

/// GET /models - Models known to the backend (possibly none) and the current one.
async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let models = state.assistant.list_models().await;

    Json(ModelsResponse {
        models,
        current_model: state.assistant.current_model().await,
    })
}

/// POST /models/{name} - Make `name` the current model, pulling it if needed.
async fn select_model(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<SelectModelResponse>) {
    if state.assistant.select_model(&name).await {
        (StatusCode::OK, Json(SelectModelResponse::selected(name)))
    } else {
        tracing::warn!("Model selection rejected: {}", name);
        (
            StatusCode::BAD_REQUEST,
            Json(SelectModelResponse::rejected(MODEL_NOT_AVAILABLE_MESSAGE)),
        )
    }
}
