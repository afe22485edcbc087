//! Environment-driven service configuration.
//!
//! Every knob can be set through the environment; defaults match a local
//! single-host deployment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the service and its collaborators.
///
/// Environment variables:
/// - `DOCUCHAT_DATA_DIR`: base directory for all durable state (default: `data`)
/// - `DOCUCHAT_PORT`: HTTP listen port (default: 8000)
/// - `GEMINI_API_KEY`: API key for the generation collaborator
/// - `GEMINI_API_BASE`: override for the Gemini endpoint
/// - `GEMINI_MODEL`: model name (default: `gemini-1.5-flash`)
/// - `DOCLING_BASE_URL`: extraction collaborator endpoint (default: `http://127.0.0.1:5001`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: Option<String>,
    pub gemini_model: String,
    pub docling_base_url: String,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DOCUCHAT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            port: std::env::var("DOCUCHAT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            gemini_api_base: std::env::var("GEMINI_API_BASE").ok(),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            docling_base_url: std::env::var("DOCLING_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5001".to_string()),
        }
    }

    /// Session records, one JSON file per session.
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("chat_sessions")
    }

    /// Uploaded files, retained verbatim.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploaded_files")
    }

    /// Markdown renditions produced by extraction.
    pub fn extracted_dir(&self) -> PathBuf {
        self.data_dir.join("extracted_docs")
    }

    /// Home of the single consolidated context blob.
    pub fn consolidated_dir(&self) -> PathBuf {
        self.data_dir.join("consolidated_docs")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
