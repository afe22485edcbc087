//! chat_core - Core types shared across the docuchat crates
//!
//! This crate provides the foundational types used by the storage, client and
//! web-service crates:
//! - `message` - chat roles and the persisted message shape
//! - `session` - session records and listing summaries
//! - `config` - environment-driven service configuration

pub mod config;
pub mod message;
pub mod session;

// Re-export commonly used types
pub use config::ServiceConfig;
pub use message::{ChatMessage, Role};
pub use session::{ChatSession, SessionSummary};
