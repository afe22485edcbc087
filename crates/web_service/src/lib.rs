//! web_service - HTTP gateway and conversation orchestrator
//!
//! Routes mirror the original service surface: `/sessions/`, `/chat/:id`,
//! `/extract/`, `/consolidate/`, `/health`. Handlers stay thin; the turn
//! protocol and ingestion logic live under `services`.

pub mod controllers;
pub mod dto;
pub mod error;
pub mod server;
pub mod services;

pub use error::{ApiError, Result};
pub use server::{app_config, AppState};
