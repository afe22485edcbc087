//! Gemini API client and the trait the orchestrator depends on.

use async_trait::async_trait;
use chat_core::ChatMessage;
use reqwest::Client;

use crate::error::{GeminiError, Result};
use crate::protocol::{
    GeminiContent, GeminiRequest, GeminiResponse, GeminiSystemInstruction, GenerationConfig,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Consolidation runs cold on purpose; it should restate, not invent.
const SUMMARY_TEMPERATURE: f64 = 0.2;

const CHAT_PREAMBLE: &str = "You are an assistant for a document knowledge base. \
Answer strictly from the reference document below. \
If the document does not cover the question, say so instead of inventing an answer.";

const CONSOLIDATION_PROMPT: &str = "Consolidate the following extracted documents into a \
single exhaustive reference document. Merge overlapping material, keep every distinct \
fact, and organize the result with Markdown headings. Each source file is delimited by \
START/END markers. Respond with the consolidated Markdown document only.";

/// Text-generation collaborator interface.
///
/// The orchestrator and the consolidation service depend on this trait, never
/// on the concrete client, so tests can substitute a mock.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Produce the assistant reply for a chat turn.
    ///
    /// `history` is replayed to the model in the exact order given, followed
    /// by `prompt` as the final user turn; `system_context` rides in the
    /// system segment.
    async fn generate(
        &self,
        system_context: &str,
        history: &[ChatMessage],
        prompt: &str,
        temperature: f64,
    ) -> Result<String>;

    /// Collapse concatenated extracted documents into one reference text.
    async fn summarize(&self, combined_markdown: &str) -> Result<String>;
}

/// Google Gemini API client (non-streaming `generateContent`).
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model name (e.g., "gemini-1.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    async fn generate_content(&self, request: &GeminiRequest) -> Result<String> {
        log::debug!(
            "Gemini request: model={}, contents={}",
            self.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.request_url())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(GeminiError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            if status == 401 || status == 403 {
                return Err(GeminiError::Auth(format!(
                    "Gemini authentication failed: {}. Please check your API key.",
                    text
                )));
            }

            return Err(GeminiError::Api(format!(
                "Gemini API error: HTTP {}: {}",
                status, text
            )));
        }

        let body: GeminiResponse = response.json().await.map_err(GeminiError::Http)?;
        body.first_text().ok_or(GeminiError::EmptyResponse)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        system_context: &str,
        history: &[ChatMessage],
        prompt: &str,
        temperature: f64,
    ) -> Result<String> {
        let mut contents: Vec<GeminiContent> = history.iter().map(GeminiContent::from).collect();
        contents.push(GeminiContent::user(prompt));

        let request = GeminiRequest {
            contents,
            system_instruction: Some(GeminiSystemInstruction::text(format!(
                "{}\n\n--- REFERENCE DOCUMENT ---\n\n{}",
                CHAT_PREAMBLE, system_context
            ))),
            generation_config: Some(GenerationConfig {
                temperature,
                max_output_tokens: None,
            }),
        };

        self.generate_content(&request).await
    }

    async fn summarize(&self, combined_markdown: &str) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent::user(format!(
                "{}\n\n{}",
                CONSOLIDATION_PROMPT, combined_markdown
            ))],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                temperature: SUMMARY_TEMPERATURE,
                max_output_tokens: None,
            }),
        };

        self.generate_content(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let client = GeminiClient::new("test_key");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_with_base_url() {
        let client = GeminiClient::new("test_key").with_base_url("http://127.0.0.1:9999");
        assert_eq!(client.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn test_with_model() {
        let client = GeminiClient::new("test_key").with_model("gemini-1.5-pro");
        assert_eq!(client.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_request_url_construction() {
        let client = GeminiClient::new("my_key_123")
            .with_base_url("https://test.api.com/v1beta")
            .with_model("gemini-custom");

        assert_eq!(
            client.request_url(),
            "https://test.api.com/v1beta/models/gemini-custom:generateContent?key=my_key_123"
        );
    }
}
