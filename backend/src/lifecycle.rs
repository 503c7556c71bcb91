//! Inference backend process management.
//!
//! Used once at startup: if the backend is not reachable, try to launch it.
//! Installing the backend is left to the operator.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::assistant::MedicalAssistant;
use crate::config::LifecycleConfig;

#[async_trait]
pub trait BackendLifecycle: Send + Sync {
    /// Whether the backend is reachable once this returns.
    async fn ensure_running(&self) -> bool;
}

/// Launches `<binary> serve` as a detached child process.
pub struct OllamaProcess {
    assistant: Arc<MedicalAssistant>,
    binary: String,
    auto_start: bool,
    startup_wait: Duration,
}

impl OllamaProcess {
    pub fn new(assistant: Arc<MedicalAssistant>, config: &LifecycleConfig) -> Self {
        Self {
            assistant,
            binary: config.binary.clone(),
            auto_start: config.auto_start,
            startup_wait: config.startup_wait(),
        }
    }

    fn spawn(&self) -> std::io::Result<()> {
        // The child is not killed on drop and outlives the gateway.
        Command::new(&self.binary)
            .arg("serve")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

#[async_trait]
impl BackendLifecycle for OllamaProcess {
    async fn ensure_running(&self) -> bool {
        if self.assistant.check_availability().await {
            tracing::info!("Ollama service is already running");
            return true;
        }

        if !self.auto_start {
            tracing::info!("Ollama not reachable and auto-start is disabled");
            return false;
        }

        tracing::info!("Starting Ollama service...");
        if let Err(e) = self.spawn() {
            tracing::warn!(
                "Failed to launch '{} serve': {}. Install Ollama from https://ollama.com and start it manually.",
                self.binary,
                e
            );
            return false;
        }

        tokio::time::sleep(self.startup_wait).await;

        if self.assistant.check_availability().await {
            tracing::info!("Ollama service started successfully");
            true
        } else {
            tracing::error!("Failed to start Ollama service");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{OllamaClient, SamplingOptions, Timeouts};

    fn unreachable_assistant() -> Arc<MedicalAssistant> {
        let timeouts = Timeouts {
            status: Duration::from_millis(200),
            ..Timeouts::default()
        };
        // Port 9 (discard) is not an HTTP server.
        let client = Arc::new(OllamaClient::new("http://127.0.0.1:9", timeouts));
        Arc::new(MedicalAssistant::new(client, "llama3.1:8b", SamplingOptions::default()))
    }

    #[tokio::test]
    async fn test_ensure_running_when_already_reachable() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "models": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(OllamaClient::new(&server.uri(), Timeouts::default()));
        let assistant = Arc::new(MedicalAssistant::new(client, "llama3.1:8b", SamplingOptions::default()));
        // A binary that cannot exist: reaching the spawn step would fail the call.
        let config = LifecycleConfig {
            auto_start: true,
            binary: "/nonexistent/ollama-binary".to_string(),
            startup_wait_secs: 0,
        };

        assert!(OllamaProcess::new(assistant, &config).ensure_running().await);
    }

    #[tokio::test]
    async fn test_ensure_running_without_auto_start() {
        let config = LifecycleConfig {
            auto_start: false,
            ..LifecycleConfig::default()
        };
        let process = OllamaProcess::new(unreachable_assistant(), &config);
        assert!(!process.ensure_running().await);
    }

    #[tokio::test]
    async fn test_ensure_running_with_missing_binary() {
        let config = LifecycleConfig {
            auto_start: true,
            binary: "/nonexistent/ollama-binary".to_string(),
            startup_wait_secs: 0,
        };
        let process = OllamaProcess::new(unreachable_assistant(), &config);
        assert!(!process.ensure_running().await);
    }
}
