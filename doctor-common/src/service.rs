//! Health, model management and error envelopes.

use serde::{Deserialize, Serialize};

/// Overall service status as reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The inference backend answered the probe.
    Healthy,
    /// The gateway is up but the inference backend is not reachable.
    Degraded,
}

impl HealthStatus {
    pub fn from_backend(reachable: bool) -> Self {
        if reachable {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub ollama_available: bool,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub current_model: String,
}

/// Outcome of `POST /models/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectModelResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SelectModelResponse {
    pub fn selected(model: impl Into<String>) -> Self {
        Self {
            success: true,
            model: Some(model.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            model: None,
            error: Some(error.into()),
        }
    }
}

/// Body of every 4xx/5xx response except a rejected model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(serde_json::to_string(&HealthStatus::Healthy).unwrap(), r#""healthy""#);
        assert_eq!(serde_json::to_string(&HealthStatus::Degraded).unwrap(), r#""degraded""#);
        assert_eq!(HealthStatus::from_backend(false), HealthStatus::Degraded);
    }

    #[test]
    fn test_select_model_response_omits_absent_fields() {
        let ok = serde_json::to_value(SelectModelResponse::selected("llama3.1:8b")).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "model": "llama3.1:8b"}));

        let rejected = serde_json::to_value(SelectModelResponse::rejected("Model not available")).unwrap();
        assert_eq!(
            rejected,
            serde_json::json!({"success": false, "error": "Model not available"})
        );
    }
}
