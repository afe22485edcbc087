//! context_store - single-slot storage for the consolidated context
//!
//! At most one consolidated knowledge-base text is active at a time; a new
//! consolidation replaces it wholesale. Absence is explicit: before the first
//! consolidation [`ContextStore::get_active_context`] yields `None`, never a
//! default text.

pub mod error;
pub mod storage;
pub mod store;

pub use error::{ContextError, Result};
pub use storage::{ContextStorage, FileContextStorage};
pub use store::ContextStore;
