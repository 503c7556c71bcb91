//! Offline Doctor Common Types
//!
//! Request and response envelopes shared by the gateway and its clients.

pub mod consultation;
pub mod service;

pub use consultation::{
    ConsultationRequest, ConsultationResponse, MedicationInteractionResponse, MedicationsRequest,
    SymptomAnalysisResponse, SymptomsRequest,
};
pub use service::{ErrorResponse, HealthResponse, HealthStatus, ModelsResponse, SelectModelResponse};

/// Seconds since the Unix epoch, with sub-second precision.
pub fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
