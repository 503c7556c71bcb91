//! Shared application state.

use std::sync::Arc;

use crate::assistant::MedicalAssistant;

/// Shared application state passed to all handlers.
pub struct AppState {
    pub assistant: Arc<MedicalAssistant>,
}

impl AppState {
    pub fn new(assistant: Arc<MedicalAssistant>) -> Self {
        Self { assistant }
    }
}
