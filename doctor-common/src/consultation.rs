//! Consultation, symptom analysis and medication interaction envelopes.

use serde::{Deserialize, Serialize};

/// Body of `POST /consultation`.
///
/// A missing or `null` field deserializes to `None` so that validation,
/// not parsing, decides the outcome. The same holds for the other requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /analyze-symptoms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<Vec<String>>,
}

/// Body of `POST /medication-interaction`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedicationsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationResponse {
    pub response: String,
    /// Model that produced `response`.
    pub model: String,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomAnalysisResponse {
    pub response: String,
    pub symptoms: Vec<String>,
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationInteractionResponse {
    pub response: String,
    pub medications: Vec<String>,
    pub timestamp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consultation_request_defaults_to_no_message() {
        let request: ConsultationRequest = serde_json::from_str("{}").unwrap();
        assert!(request.message.is_none());
    }

    #[test]
    fn test_null_fields_deserialize_as_absent() {
        let consultation: ConsultationRequest =
            serde_json::from_str(r#"{"message": null}"#).unwrap();
        assert!(consultation.message.is_none());

        let symptoms: SymptomsRequest = serde_json::from_str(r#"{"symptoms": null}"#).unwrap();
        assert!(symptoms.symptoms.is_none());

        let medications: MedicationsRequest =
            serde_json::from_str(r#"{"medications": null}"#).unwrap();
        assert!(medications.medications.is_none());
    }

    #[test]
    fn test_symptoms_request_preserves_order() {
        let request: SymptomsRequest =
            serde_json::from_str(r#"{"symptoms": ["fever", "cough", "headache"]}"#).unwrap();
        assert_eq!(
            request.symptoms,
            Some(vec!["fever".to_string(), "cough".to_string(), "headache".to_string()])
        );
    }

    #[test]
    fn test_medications_request_rejects_non_string_entries() {
        let result = serde_json::from_str::<MedicationsRequest>(r#"{"medications": [1, 2]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_symptom_analysis_response_field_names() {
        let response = SymptomAnalysisResponse {
            response: "rest and fluids".to_string(),
            symptoms: vec!["fever".to_string()],
            timestamp: 1700000000.5,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response"], "rest and fluids");
        assert_eq!(json["symptoms"][0], "fever");
        assert!(json["timestamp"].is_f64());
    }
}
