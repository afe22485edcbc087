//! Extraction client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Converter returned no markdown content")]
    MissingContent,
}

pub type Result<T> = std::result::Result<T, ExtractionError>;
