//! Gemini client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Model returned no usable candidates")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, GeminiError>;
