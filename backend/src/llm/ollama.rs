use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{InferenceBackend, SamplingOptions};
use crate::config::OllamaConfig;

/// Per-operation request timeouts.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub status: Duration,
    pub list: Duration,
    pub pull: Duration,
    pub generate: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from(&OllamaConfig::default())
    }
}

impl From<&OllamaConfig> for Timeouts {
    fn from(config: &OllamaConfig) -> Self {
        Self {
            status: Duration::from_secs(config.status_timeout_secs),
            list: Duration::from_secs(config.list_timeout_secs),
            pull: Duration::from_secs(config.pull_timeout_secs),
            generate: Duration::from_secs(config.generate_timeout_secs),
        }
    }
}

/// Client for communicating with Ollama API.
pub struct OllamaClient {
    http_client: Client,
    base_url: String,
    timeouts: Timeouts,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a SamplingOptions,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Serialize)]
struct OllamaPullRequest<'a> {
    name: &'a str,
    stream: bool,
}

/// Response from /api/tags endpoint.
#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelInfo>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelInfo {
    name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),
    #[error("Ollama returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for OllamaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            OllamaError::Timeout
        } else {
            OllamaError::RequestFailed(e.to_string())
        }
    }
}

impl OllamaClient {
    pub fn new(base_url: &str, timeouts: Timeouts) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeouts,
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(&config.base_url, Timeouts::from(config))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-success statuses into `OllamaError::Status`.
    async fn send(&self, request: RequestBuilder, timeout: Duration) -> Result<Response, OllamaError> {
        let response = request.timeout(timeout).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Status { status, body });
        }

        Ok(response)
    }

    async fn tags(&self, timeout: Duration) -> Result<OllamaTagsResponse, OllamaError> {
        let response = self
            .send(self.http_client.get(self.url("/api/tags")), timeout)
            .await?;

        response.json().await.map_err(|e| {
            if e.is_timeout() {
                OllamaError::Timeout
            } else {
                OllamaError::InvalidResponse(e.to_string())
            }
        })
    }
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn probe(&self) -> Result<(), OllamaError> {
        self.send(self.http_client.get(self.url("/api/tags")), self.timeouts.status)
            .await
            .map(|_| ())
    }

    async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let tags = self.tags(self.timeouts.list).await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn pull_model(&self, model: &str) -> Result<(), OllamaError> {
        let request = OllamaPullRequest {
            name: model,
            stream: false,
        };

        tracing::debug!("Pulling model {} from {}", model, self.base_url);

        self.send(
            self.http_client.post(self.url("/api/pull")).json(&request),
            self.timeouts.pull,
        )
        .await
        .map(|_| ())
    }

    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &SamplingOptions,
    ) -> Result<Option<String>, OllamaError> {
        let request = OllamaGenerateRequest {
            model,
            prompt,
            stream: false,
            options,
        };

        tracing::debug!("Sending generate request to Ollama: model={}", model);

        let response = self
            .send(
                self.http_client.post(self.url("/api/generate")).json(&request),
                self.timeouts.generate,
            )
            .await?;

        let body: OllamaGenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                OllamaError::Timeout
            } else {
                OllamaError::InvalidResponse(e.to_string())
            }
        })?;

        Ok(body.response)
    }
}
