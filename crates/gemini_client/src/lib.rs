//! gemini_client - Google Gemini client for generation and consolidation
//!
//! Wraps the non-streaming `generateContent` endpoint behind the
//! [`GenerationClient`] trait so the orchestrator can be exercised against a
//! mock. One client instance owns one long-lived HTTP connection pool.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{GeminiClient, GenerationClient};
pub use error::{GeminiError, Result};
