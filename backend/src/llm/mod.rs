//! Inference backend abstraction.
//!
//! `InferenceBackend` covers the three operations the gateway needs from a
//! text-generation service: listing models, pulling a model, and one-shot
//! generation. `OllamaClient` is the production implementation.

mod ollama;

pub use ollama::{OllamaClient, OllamaError, Timeouts};

use async_trait::async_trait;
use serde::Serialize;

/// Sampling options for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    /// Output token cap.
    #[serde(rename = "num_predict")]
    pub max_tokens: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.9,
            max_tokens: 500,
        }
    }
}

impl From<&crate::config::GenerationConfig> for SamplingOptions {
    fn from(config: &crate::config::GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short-timeout probe of the listing endpoint.
    async fn probe(&self) -> Result<(), OllamaError>;

    /// Names of the models the backend has locally.
    async fn list_models(&self) -> Result<Vec<String>, OllamaError>;

    /// Download a model; completes once the pull has finished.
    async fn pull_model(&self, model: &str) -> Result<(), OllamaError>;

    /// Single-shot, non-streaming generation. `None` when the backend
    /// returned no text field.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<Option<String>, OllamaError>;
}
