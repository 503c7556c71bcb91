use std::any::Any;
use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::ApiError;

const SLOW_GENERATION: Duration = Duration::from_secs(30);

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Which part of the gateway a request path belongs to.
fn endpoint_kind(path: &str) -> &'static str {
    match path {
        "/consultation" | "/analyze-symptoms" | "/medication-interaction" => "generation",
        "/health" => "health",
        p if p == "/models" || p.starts_with("/models/") => "models",
        _ => "other",
    }
}

/// Logs one line per gateway request. Generation requests slower than
/// `SLOW_GENERATION` are logged at WARN.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let endpoint = endpoint_kind(&path);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed();

    if endpoint == "generation" && elapsed >= SLOW_GENERATION {
        tracing::warn!(
            %method,
            %path,
            endpoint,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Slow generation request"
        );
    } else {
        tracing::info!(
            %method,
            %path,
            endpoint,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Gateway request"
        );
    }

    response
}

/// Turn a handler panic into a 500 with the generic error body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
