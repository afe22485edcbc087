pub mod chat_controller;
pub mod document_controller;
pub mod session_controller;
pub mod system_controller;

use uuid::Uuid;

use crate::error::ApiError;

/// Parse a session id from a path segment.
///
/// A malformed id is indistinguishable from an unknown one at the API
/// surface: both are "Session not found".
pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::SessionNotFound)
}
