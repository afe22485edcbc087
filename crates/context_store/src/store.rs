//! Context store - handle over a [`ContextStorage`] backend

use crate::error::Result;
use crate::storage::ContextStorage;
use std::sync::Arc;

/// Shared handle to the current consolidated context.
pub struct ContextStore<S: ContextStorage> {
    storage: Arc<S>,
}

impl<S: ContextStorage> ContextStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// The most recently produced consolidated text, or `None` if
    /// consolidation has never run (or was reset).
    pub async fn get_active_context(&self) -> Result<Option<String>> {
        self.storage.load().await
    }

    /// Replace the active context with a freshly consolidated text.
    pub async fn set_active_context(&self, text: &str) -> Result<()> {
        self.storage.store(text).await
    }

    /// Forget the active context; subsequent chat requests fail until the
    /// next consolidation.
    pub async fn reset(&self) -> Result<()> {
        self.storage.clear().await
    }
}
