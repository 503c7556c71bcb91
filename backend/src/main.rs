//! Offline Doctor gateway - medical assistant endpoints over a local Ollama.

use std::env;

use offline_doctor_backend::{app, build_state, logging, BackendLifecycle, Config, OllamaProcess};
use tokio::net::TcpListener;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("offline-doctor {}", VERSION);
        return Ok(());
    }

    let config = Config::load().map_err(|e| format!("Failed to load configuration: {}", e))?;

    logging::init(&config.logging.level);

    tracing::info!("Starting Offline Doctor backend {}", VERSION);

    let state = build_state(&config);

    let lifecycle = OllamaProcess::new(state.assistant.clone(), &config.lifecycle);
    if !lifecycle.ensure_running().await {
        tracing::warn!("Could not reach Ollama at {}. Some features may not work.", config.ollama.base_url);
    }

    tracing::info!("Ensuring {} model is available...", config.ollama.model);
    if !state.assistant.ensure_model_available(None).await {
        tracing::warn!("Default model {} is not available", config.ollama.model);
    }

    let app = app(state, &config.cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
