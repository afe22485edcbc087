//! docling-serve client and the trait the ingestion path depends on.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;

use crate::error::{ExtractionError, Result};
use crate::protocol::{ConvertOptions, ConvertRequest, ConvertResponse, FileSource};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";
const CONVERT_PATH: &str = "/v1alpha/convert/source";

/// Document extraction collaborator interface.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Convert one uploaded file to its markdown rendition.
    async fn convert(&self, bytes: &[u8], filename: &str) -> Result<String>;
}

/// Client for a docling-serve instance.
pub struct DoclingClient {
    client: Client,
    base_url: String,
}

impl DoclingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn convert_url(&self) -> String {
        format!("{}{}", self.base_url, CONVERT_PATH)
    }
}

impl Default for DoclingClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ExtractionClient for DoclingClient {
    async fn convert(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        let request = ConvertRequest {
            options: ConvertOptions::default(),
            sources: vec![FileSource::new(payload, filename)],
        };

        log::debug!(
            "docling convert: file={}, {} bytes",
            filename,
            bytes.len()
        );

        let response = self
            .client
            .post(self.convert_url())
            .json(&request)
            .send()
            .await
            .map_err(ExtractionError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Conversion(format!(
                "docling-serve HTTP {}: {}",
                status, text
            )));
        }

        let body: ConvertResponse = response.json().await.map_err(ExtractionError::Http)?;

        if body.status != "success" {
            let detail = serde_json::to_string(&body.errors).unwrap_or_default();
            return Err(ExtractionError::Conversion(format!(
                "conversion status {}: {}",
                body.status, detail
            )));
        }

        body.document
            .and_then(|doc| doc.md_content)
            .ok_or(ExtractionError::MissingContent)
    }
}
