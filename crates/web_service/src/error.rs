use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use context_store::ContextError;
use docling_client::ExtractionError;
use gemini_client::GeminiError;
use session_store::SessionError;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Base context not found. Please run /consolidate/ first.")]
    ContextNotReady,

    #[error("No extracted documents found to consolidate.")]
    NoDocuments,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Collaborator(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NotFound => ApiError::SessionNotFound,
            other => ApiError::Storage(other.to_string()),
        }
    }
}

impl From<ContextError> for ApiError {
    fn from(e: ContextError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<GeminiError> for ApiError {
    fn from(e: GeminiError) -> Self {
        ApiError::Collaborator(e.to_string())
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        ApiError::Collaborator(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Storage(e.to_string())
    }
}

/// Error body shape: `{"detail": "..."}`.
#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound | ApiError::ContextNotReady | ApiError::NoDocuments => {
                StatusCode::NOT_FOUND
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Collaborator(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail {
            detail: self.to_string(),
        })
    }
}
