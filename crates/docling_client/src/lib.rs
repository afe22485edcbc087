//! docling_client - client for the docling-serve extraction service
//!
//! Document parsing itself is an external concern; this crate only speaks
//! the docling-serve REST contract: file bytes in, markdown rendition out.
//! The client is meant to be constructed once at process start and shared,
//! not rebuilt per request.

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{DoclingClient, ExtractionClient};
pub use error::{ExtractionError, Result};
