pub mod assistant;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod llm;
pub mod logging;
pub mod routes;
pub mod state;

pub use assistant::{GenerationResult, MedicalAssistant};
pub use config::Config;
pub use error::ApiError;
pub use lifecycle::{BackendLifecycle, OllamaProcess};
pub use llm::{InferenceBackend, OllamaClient, OllamaError, SamplingOptions, Timeouts};
pub use state::AppState;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;

/// Build the CORS layer from the configured origin list.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = match config.allowed_origins() {
        None => AllowOrigin::any(),
        Some(origins) => {
            let values: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full application: routes, state and middleware.
pub fn app(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    routes::router()
        .layer(CatchPanicLayer::custom(logging::panic_response))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the Ollama client and assistant from configuration.
pub fn build_state(config: &Config) -> Arc<AppState> {
    let client = Arc::new(OllamaClient::from_config(&config.ollama));
    let assistant = Arc::new(MedicalAssistant::new(
        client,
        config.ollama.model.clone(),
        SamplingOptions::from(&config.generation),
    ));
    Arc::new(AppState::new(assistant))
}
