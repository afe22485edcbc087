//! Request and response bodies for the HTTP surface.
//!
//! Session records and listing summaries serialize straight from
//! `chat_core`; only the endpoint-specific shapes live here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_temperature() -> f64 {
    0.7
}

/// Body of `POST /chat/{session_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Body of a successful chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Body of `POST /sessions/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Body of a successful `POST /extract/`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub status: String,
    pub extracted_file: String,
    pub extracted_content: String,
}

/// Body of a successful `POST /consolidate/`.
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidateResponse {
    pub status: String,
    pub message: String,
    pub file: String,
    pub content_preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults_temperature() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"prompt": "What is in the corpus?"}"#).unwrap();
        assert_eq!(request.prompt, "What is in the corpus?");
        assert_eq!(request.temperature, 0.7);
    }

    #[test]
    fn test_chat_request_accepts_explicit_temperature() {
        let request: ChatRequest =
            serde_json::from_str(r#"{"prompt": "hi", "temperature": 0.1}"#).unwrap();
        assert_eq!(request.temperature, 0.1);
    }
}
