//! Medical assistant: the policy layer over an inference backend.
//!
//! Every operation here degrades to a value (`bool`, empty list, or a fixed
//! apology text) instead of returning an error; backend failures are logged
//! and never reach the HTTP handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::llm::{InferenceBackend, OllamaError, SamplingOptions};

/// Instructions prepended to every prompt.
pub const MEDICAL_PREAMBLE: &str = "\
You are a medical AI assistant designed to provide helpful medical information and guidance.
Your role is to:
1. Analyze symptoms and provide general medical guidance
2. Suggest when to seek professional medical care
3. Provide information about common conditions
4. Offer health and wellness advice

Important disclaimers:
- You are not a replacement for professional medical diagnosis or treatment
- Always recommend consulting healthcare professionals for serious concerns
- Do not provide specific medication dosages or prescriptions
- Emphasize the importance of professional medical care when appropriate

Please provide helpful, accurate, and responsible medical guidance.";

pub const MODEL_UNAVAILABLE_TEXT: &str =
    "I'm sorry, but the medical AI model is not currently available. Please check your Ollama installation.";
pub const EMPTY_RESPONSE_TEXT: &str = "I apologize, but I could not generate a response.";
pub const TECHNICAL_DIFFICULTIES_TEXT: &str =
    "I'm experiencing technical difficulties. Please try again later.";
pub const TIMEOUT_TEXT: &str = "The request timed out. Please try again with a shorter message.";
pub const PROCESSING_ERROR_TEXT: &str =
    "I'm sorry, but I encountered an error while processing your request.";

/// Text produced for one prompt, and the model that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    pub model: String,
    pub timestamp: f64,
}

/// Compose the full prompt sent to the backend.
pub fn build_prompt(user_message: &str) -> String {
    format!(
        "{}\n\nPatient: {}\n\nMedical Assistant:",
        MEDICAL_PREAMBLE, user_message
    )
}

/// Prompt for `POST /analyze-symptoms`.
pub fn symptoms_prompt(symptoms: &[String]) -> String {
    format!(
        "I have the following symptoms: {}. What could this indicate and what should I do?",
        symptoms.join(", ")
    )
}

/// Prompt for `POST /medication-interaction`.
pub fn medications_prompt(medications: &[String]) -> String {
    format!(
        "Are there any known interactions between these medications: {}?",
        medications.join(", ")
    )
}

pub struct MedicalAssistant {
    backend: Arc<dyn InferenceBackend>,
    current_model: RwLock<String>,
    options: SamplingOptions,
}

impl MedicalAssistant {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        default_model: impl Into<String>,
        options: SamplingOptions,
    ) -> Self {
        Self {
            backend,
            current_model: RwLock::new(default_model.into()),
            options,
        }
    }

    pub async fn current_model(&self) -> String {
        self.current_model.read().await.clone()
    }

    /// Whether the backend answers its listing endpoint.
    pub async fn check_availability(&self) -> bool {
        match self.backend.probe().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Ollama status check failed: {}", e);
                false
            }
        }
    }

    /// Models the backend has locally; empty on any failure.
    pub async fn list_models(&self) -> Vec<String> {
        match self.backend.list_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::error!("Failed to get models: {}", e);
                Vec::new()
            }
        }
    }

    /// Make sure `model` (or the current model) is present, pulling it if
    /// needed. No retry.
    pub async fn ensure_model_available(&self, model: Option<&str>) -> bool {
        let model = match model {
            Some(m) => m.to_string(),
            None => self.current_model().await,
        };

        if self.list_models().await.iter().any(|m| *m == model) {
            return true;
        }

        tracing::info!("Pulling model {}...", model);
        match self.backend.pull_model(&model).await {
            Ok(()) => {
                tracing::info!("Model {} pulled successfully", model);
                true
            }
            Err(e) => {
                tracing::error!("Failed to pull model {}: {}", model, e);
                false
            }
        }
    }

    /// Switch the current model. The previous model is kept when `model`
    /// cannot be made available.
    pub async fn select_model(&self, model: &str) -> bool {
        if !self.ensure_model_available(Some(model)).await {
            return false;
        }

        let mut current = self.current_model.write().await;
        if *current != model {
            tracing::info!("Current model changed from {} to {}", *current, model);
            *current = model.to_string();
        }
        true
    }

    /// Generate a medical response for `prompt`. Never fails: backend
    /// problems come back as one of the fixed apology texts.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        // One read, so a concurrent model switch cannot split this call
        // across two models.
        let model = self.current_model().await;
        let text = self.generate_with(&model, prompt).await;

        GenerationResult {
            text,
            model,
            timestamp: doctor_common::unix_timestamp(),
        }
    }

    async fn generate_with(&self, model: &str, prompt: &str) -> String {
        if !self.ensure_model_available(Some(model)).await {
            return MODEL_UNAVAILABLE_TEXT.to_string();
        }

        let full_prompt = build_prompt(prompt);

        match self.backend.generate(model, &full_prompt, &self.options).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => EMPTY_RESPONSE_TEXT.to_string(),
            Err(OllamaError::Timeout) => {
                tracing::warn!("Generation with {} timed out", model);
                TIMEOUT_TEXT.to_string()
            }
            Err(OllamaError::Status { status, body }) => {
                tracing::error!("Ollama API error: {} - {}", status, body);
                TECHNICAL_DIFFICULTIES_TEXT.to_string()
            }
            Err(e) => {
                tracing::error!("Error generating response: {}", e);
                PROCESSING_ERROR_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Reply = fn() -> Result<Option<String>, OllamaError>;

    /// Scripted backend recording the calls it receives.
    struct FakeBackend {
        models: Vec<String>,
        pull_ok: bool,
        reply: Reply,
        calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn new(models: &[&str], reply: Reply) -> Self {
            Self {
                models: models.iter().map(|m| m.to_string()).collect(),
                pull_ok: false,
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceBackend for FakeBackend {
        async fn probe(&self) -> Result<(), OllamaError> {
            self.calls.lock().unwrap().push("probe".to_string());
            Ok(())
        }

        async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(self.models.clone())
        }

        async fn pull_model(&self, model: &str) -> Result<(), OllamaError> {
            self.calls.lock().unwrap().push(format!("pull {}", model));
            if self.pull_ok {
                Ok(())
            } else {
                Err(OllamaError::Status {
                    status: 404,
                    body: "not found".to_string(),
                })
            }
        }

        async fn generate(
            &self,
            model: &str,
            prompt: &str,
            _options: &SamplingOptions,
        ) -> Result<Option<String>, OllamaError> {
            assert!(prompt.starts_with(MEDICAL_PREAMBLE));
            self.calls.lock().unwrap().push(format!("generate {}", model));
            (self.reply)()
        }
    }

    fn assistant(backend: Arc<FakeBackend>) -> MedicalAssistant {
        MedicalAssistant::new(backend, "llama3.1:8b", SamplingOptions::default())
    }

    #[test]
    fn test_build_prompt_layout() {
        let prompt = build_prompt("I have a headache");
        assert!(prompt.starts_with(MEDICAL_PREAMBLE));
        assert!(prompt.ends_with("\n\nPatient: I have a headache\n\nMedical Assistant:"));
    }

    #[test]
    fn test_symptoms_and_medications_prompts() {
        let symptoms = vec!["fever".to_string(), "cough".to_string()];
        assert_eq!(
            symptoms_prompt(&symptoms),
            "I have the following symptoms: fever, cough. What could this indicate and what should I do?"
        );

        let meds = vec!["aspirin".to_string(), "warfarin".to_string()];
        assert_eq!(
            medications_prompt(&meds),
            "Are there any known interactions between these medications: aspirin, warfarin?"
        );
    }

    #[tokio::test]
    async fn test_generate_returns_backend_text() {
        let backend = Arc::new(FakeBackend::new(&["llama3.1:8b"], || {
            Ok(Some("Drink water".to_string()))
        }));
        let result = assistant(backend.clone()).generate("thirsty").await;

        assert_eq!(result.text, "Drink water");
        assert_eq!(result.model, "llama3.1:8b");
        assert_eq!(backend.calls(), vec!["list", "generate llama3.1:8b"]);
    }

    #[tokio::test]
    async fn test_generate_maps_failures_to_fixed_texts() {
        let cases: [(Reply, &str); 5] = [
            (|| Ok(None), EMPTY_RESPONSE_TEXT),
            (|| Ok(Some(String::new())), EMPTY_RESPONSE_TEXT),
            (|| Err(OllamaError::Timeout), TIMEOUT_TEXT),
            (
                || {
                    Err(OllamaError::Status {
                        status: 500,
                        body: "boom".to_string(),
                    })
                },
                TECHNICAL_DIFFICULTIES_TEXT,
            ),
            (
                || Err(OllamaError::RequestFailed("connection refused".to_string())),
                PROCESSING_ERROR_TEXT,
            ),
        ];

        for (reply, expected) in cases {
            let backend = Arc::new(FakeBackend::new(&["llama3.1:8b"], reply));
            let result = assistant(backend).generate("hello").await;
            assert_eq!(result.text, expected);
        }
    }

    #[tokio::test]
    async fn test_generate_refuses_when_model_cannot_be_pulled() {
        let backend = Arc::new(FakeBackend::new(&[], || Ok(Some("unused".to_string()))));
        let result = assistant(backend.clone()).generate("hello").await;

        assert_eq!(result.text, MODEL_UNAVAILABLE_TEXT);
        assert_eq!(backend.calls(), vec!["list", "pull llama3.1:8b"]);
    }

    #[tokio::test]
    async fn test_select_model_retains_previous_on_failure() {
        let backend = Arc::new(FakeBackend::new(&["llama3.1:8b", "mistral:7b"], || Ok(None)));
        let assistant = assistant(backend);

        assert!(!assistant.select_model("missing:1b").await);
        assert_eq!(assistant.current_model().await, "llama3.1:8b");

        assert!(assistant.select_model("mistral:7b").await);
        assert_eq!(assistant.current_model().await, "mistral:7b");
    }

    #[tokio::test]
    async fn test_ensure_model_available_pulls_missing_model() {
        let mut backend = FakeBackend::new(&[], || Ok(None));
        backend.pull_ok = true;
        let backend = Arc::new(backend);

        assert!(assistant(backend.clone()).ensure_model_available(None).await);
        assert_eq!(backend.calls(), vec!["list", "pull llama3.1:8b"]);
    }
}
