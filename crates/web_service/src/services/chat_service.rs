//! Conversation orchestrator.
//!
//! One `respond` call is one conversation turn: resolve the consolidated
//! context, replay the session history to the generation collaborator with
//! the new prompt, and commit the turn pair only after the collaborator
//! succeeds. A failed generation leaves the session exactly as it was.

use std::sync::Arc;

use log::{error, info};
use uuid::Uuid;

use context_store::{ContextStorage, ContextStore};
use gemini_client::GenerationClient;
use session_store::{SessionStorage, SessionStore};

use crate::error::{ApiError, Result};

pub struct ChatService<S: SessionStorage, C: ContextStorage> {
    session_store: Arc<SessionStore<S>>,
    context_store: Arc<ContextStore<C>>,
    generation_client: Arc<dyn GenerationClient>,
}

impl<S: SessionStorage, C: ContextStorage> ChatService<S, C> {
    pub fn new(
        session_store: Arc<SessionStore<S>>,
        context_store: Arc<ContextStore<C>>,
        generation_client: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            session_store,
            context_store,
            generation_client,
        }
    }

    /// Run one conversation turn against the active context.
    ///
    /// Fails with `ContextNotReady` before touching the session when no
    /// consolidation has run; an absent context never degrades to an empty
    /// one. No global lock is held across the collaborator round trip, so
    /// turns on different sessions run concurrently.
    pub async fn respond(
        &self,
        session_id: Uuid,
        prompt: &str,
        temperature: f64,
    ) -> Result<String> {
        let context = self
            .context_store
            .get_active_context()
            .await?
            .ok_or(ApiError::ContextNotReady)?;

        let session = self.session_store.get_session(session_id).await?;

        let reply = self
            .generation_client
            .generate(&context, &session.messages, prompt, temperature)
            .await
            .map_err(|e| {
                error!("Generation failed for session {}: {}", session_id, e);
                ApiError::from(e)
            })?;

        // Persist only after the collaborator succeeded, both turns in one
        // write, so history never carries a user turn without its reply.
        self.session_store
            .append_exchange(session_id, prompt, reply.as_str())
            .await
            .map_err(|e| {
                error!("Failed to persist turn for session {}: {}", session_id, e);
                ApiError::from(e)
            })?;

        info!(
            "Session {}: turn committed ({} history messages before, {} reply chars)",
            session_id,
            session.messages.len(),
            reply.len()
        );

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chat_core::{ChatMessage, Role};
    use context_store::FileContextStorage;
    use session_store::FileSessionStorage;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct StubGeneration {
        reply: Option<String>,
        seen_history_lens: Mutex<Vec<usize>>,
    }

    impl StubGeneration {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                seen_history_lens: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen_history_lens: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationClient for StubGeneration {
        async fn generate(
            &self,
            _system_context: &str,
            history: &[ChatMessage],
            _prompt: &str,
            _temperature: f64,
        ) -> gemini_client::Result<String> {
            self.seen_history_lens.lock().unwrap().push(history.len());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(gemini_client::GeminiError::Api("stub outage".to_string())),
            }
        }

        async fn summarize(&self, _combined_markdown: &str) -> gemini_client::Result<String> {
            Ok("summary".to_string())
        }
    }

    fn service_with(
        dir: &std::path::Path,
        generation: Arc<StubGeneration>,
    ) -> (
        ChatService<FileSessionStorage, FileContextStorage>,
        Arc<SessionStore<FileSessionStorage>>,
        Arc<ContextStore<FileContextStorage>>,
    ) {
        let session_store = Arc::new(SessionStore::new(FileSessionStorage::new(
            dir.join("chat_sessions"),
        )));
        let context_store = Arc::new(ContextStore::new(FileContextStorage::new(
            dir.join("consolidated_docs"),
        )));
        let service = ChatService::new(session_store.clone(), context_store.clone(), generation);
        (service, session_store, context_store)
    }

    #[tokio::test]
    async fn test_respond_requires_consolidated_context() {
        let dir = tempdir().unwrap();
        let (service, session_store, _context_store) =
            service_with(dir.path(), Arc::new(StubGeneration::replying("hi")));

        let session = session_store.create_session().await.unwrap();
        let err = service.respond(session.id, "hello", 0.7).await.unwrap_err();

        assert!(matches!(err, ApiError::ContextNotReady));

        // The refused turn must leave no trace in the session.
        let after = session_store.get_session(session.id).await.unwrap();
        assert!(after.messages.is_empty());
    }

    #[tokio::test]
    async fn test_respond_rejects_unknown_session() {
        let dir = tempdir().unwrap();
        let (service, _session_store, context_store) =
            service_with(dir.path(), Arc::new(StubGeneration::replying("hi")));
        context_store.set_active_context("the corpus").await.unwrap();

        let err = service
            .respond(Uuid::new_v4(), "hello", 0.7)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_respond_commits_exactly_one_turn_pair() {
        let dir = tempdir().unwrap();
        let (service, session_store, context_store) =
            service_with(dir.path(), Arc::new(StubGeneration::replying("the answer")));
        context_store.set_active_context("the corpus").await.unwrap();

        let session = session_store.create_session().await.unwrap();
        let reply = service
            .respond(session.id, "the question", 0.7)
            .await
            .unwrap();
        assert_eq!(reply, "the answer");

        let after = session_store.get_session(session.id).await.unwrap();
        assert_eq!(after.messages.len(), 2);
        assert_eq!(after.messages[0].role, Role::User);
        assert_eq!(after.messages[0].content, "the question");
        assert_eq!(after.messages[1].role, Role::Assistant);
        assert_eq!(after.messages[1].content, "the answer");
    }

    #[tokio::test]
    async fn test_failed_generation_persists_nothing() {
        let dir = tempdir().unwrap();
        let (service, session_store, context_store) =
            service_with(dir.path(), Arc::new(StubGeneration::failing()));
        context_store.set_active_context("the corpus").await.unwrap();

        let session = session_store.create_session().await.unwrap();
        let err = service.respond(session.id, "hello", 0.7).await.unwrap_err();
        assert!(matches!(err, ApiError::Collaborator(_)));

        let after = session_store.get_session(session.id).await.unwrap();
        assert!(after.messages.is_empty());
    }

    #[tokio::test]
    async fn test_history_grows_between_turns() {
        let dir = tempdir().unwrap();
        let stub = Arc::new(StubGeneration::replying("reply"));
        let (service, session_store, context_store) = service_with(dir.path(), stub.clone());
        context_store.set_active_context("the corpus").await.unwrap();

        let session = session_store.create_session().await.unwrap();
        service.respond(session.id, "first", 0.7).await.unwrap();
        service.respond(session.id, "second", 0.7).await.unwrap();

        let after = session_store.get_session(session.id).await.unwrap();
        assert_eq!(after.messages.len(), 4);
        assert_eq!(after.messages[2].content, "second");

        // Second turn replayed the first committed pair as history.
        assert_eq!(*stub.seen_history_lens.lock().unwrap(), vec![0, 2]);
    }
}
