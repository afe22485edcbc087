//! Gemini `generateContent` wire types.
//!
//! The Gemini API differs from the OpenAI-style shape:
//! - messages are called "contents"
//! - the assistant role is `"model"`, not `"assistant"`
//! - content is an array of parts
//! - system instructions travel separately from the contents
//!
//! # Example request
//! ```json
//! {
//!   "contents": [
//!     {"role": "user", "parts": [{"text": "Hello"}]}
//!   ],
//!   "systemInstruction": {"parts": [{"text": "You are helpful"}]},
//!   "generationConfig": {"temperature": 0.7}
//! }
//! ```

use chat_core::{ChatMessage, Role};
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation history, oldest first, ending with the new user turn.
    pub contents: Vec<GeminiContent>,
    /// System segment (grounding preamble + corpus text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One turn of the conversation in Gemini's format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    /// `"user"` or `"model"`.
    pub role: String,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![GeminiPart { text: text.into() }],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

impl From<&ChatMessage> for GeminiContent {
    fn from(msg: &ChatMessage) -> Self {
        match msg.role {
            Role::User => GeminiContent::user(msg.content.clone()),
            Role::Assistant => GeminiContent::model(msg.content.clone()),
        }
    }
}

/// Text fragment of a content entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// System instruction envelope; role is implied, only parts are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSystemInstruction {
    pub parts: Vec<GeminiPart>,
}

impl GeminiSystemInstruction {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![GeminiPart { text: text.into() }],
        }
    }
}

/// Sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Response body for `generateContent`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Text of the first candidate, if the model produced one.
    pub fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text = candidate.content.text();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: GeminiContent,
    #[serde(default)]
    pub finish_reason: Option<String>,
}
