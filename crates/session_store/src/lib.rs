//! session_store - durable keyed storage of chat sessions
//!
//! One record per session, append-only message history. The storage backend
//! is pluggable through [`SessionStorage`]; the default backend keeps one
//! JSON file per session. [`SessionStore`] layers per-session serialization
//! on top so concurrent appends never lose updates.

pub mod error;
pub mod storage;
pub mod store;

pub use error::{Result, SessionError};
pub use storage::{FileSessionStorage, SessionStorage};
pub use store::SessionStore;
