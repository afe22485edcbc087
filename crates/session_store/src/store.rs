//! Session store - concurrent manager over a [`SessionStorage`] backend

use crate::error::{Result, SessionError};
use crate::storage::SessionStorage;
use chat_core::{ChatMessage, ChatSession, Role, SessionSummary};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Keyed store of session records with per-session append serialization.
///
/// Reads always go through the backend, so the store itself holds no record
/// state; it only tracks one async mutex per session id. Appends to the same
/// session take that mutex across their read-modify-write, which keeps the
/// message log free of lost updates. Appends to different sessions never
/// contend.
pub struct SessionStore<S: SessionStorage> {
    storage: Arc<S>,
    locks: RwLock<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Create and persist a new empty session.
    ///
    /// Safe to call concurrently; ids are v4 UUIDs so two in-flight calls
    /// always produce two distinct records.
    pub async fn create_session(&self) -> Result<ChatSession> {
        let session = ChatSession::new();
        self.storage.save(&session).await?;
        tracing::info!(session_id = %session.id, "created session");
        Ok(session)
    }

    /// Full record for a session, or [`SessionError::NotFound`].
    pub async fn get_session(&self, id: Uuid) -> Result<ChatSession> {
        self.storage.load(id).await
    }

    /// Append one message to a session's log.
    ///
    /// The timestamp is assigned here and clamped so it never precedes the
    /// previous message, even across wall-clock regressions.
    pub async fn append_message(
        &self,
        id: Uuid,
        role: Role,
        content: impl Into<String>,
    ) -> Result<ChatMessage> {
        let lock = self.session_lock(id).await;
        let _guard = lock.lock().await;

        let mut session = self.storage.load(id).await?;
        let message = next_message(&session, role, content.into());
        session.messages.push(message.clone());
        self.storage.save(&session).await?;

        Ok(message)
    }

    /// Commit a user prompt and the assistant reply as one atomic pair.
    ///
    /// Both messages land in a single record write, so no observer can see
    /// the user turn without its reply.
    pub async fn append_exchange(
        &self,
        id: Uuid,
        prompt: impl Into<String>,
        reply: impl Into<String>,
    ) -> Result<(ChatMessage, ChatMessage)> {
        let lock = self.session_lock(id).await;
        let _guard = lock.lock().await;

        let mut session = self.storage.load(id).await?;
        let user = next_message(&session, Role::User, prompt.into());
        session.messages.push(user.clone());
        let assistant = next_message(&session, Role::Assistant, reply.into());
        session.messages.push(assistant.clone());
        self.storage.save(&session).await?;

        tracing::debug!(
            session_id = %id,
            message_count = session.messages.len(),
            "committed turn pair"
        );

        Ok((user, assistant))
    }

    /// Summaries of every readable session, newest first.
    ///
    /// Unreadable records are skipped and logged rather than failing the
    /// whole listing; one corrupt file must not hide the other sessions.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let ids = self.storage.list_ids().await?;

        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.storage.load(id).await {
                Ok(session) => summaries.push(session.summary()),
                Err(e) => {
                    tracing::warn!(session_id = %id, error = %e, "skipping unreadable session record");
                }
            }
        }

        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(summaries)
    }

    async fn session_lock(&self, id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&id) {
                return lock.clone();
            }
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn next_message(session: &ChatSession, role: Role, content: String) -> ChatMessage {
    let mut message = ChatMessage::new(role, content);
    if let Some(prev) = session.last_message_at() {
        if prev > message.timestamp {
            message.timestamp = prev;
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileSessionStorage;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn store_in(dir: &std::path::Path) -> SessionStore<FileSessionStorage> {
        SessionStore::new(FileSessionStorage::new(dir))
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let created = store.create_session().await.unwrap();
        let loaded = store.get_session(created.id).await.unwrap();

        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.created_at, created.created_at);
        assert!(loaded.messages.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let result = store.get_session(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SessionError::NotFound)));
    }

    #[tokio::test]
    async fn test_append_to_unknown_session_is_not_found() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let result = store.append_message(Uuid::new_v4(), Role::User, "hi").await;
        assert!(matches!(result, Err(SessionError::NotFound)));
    }

    #[tokio::test]
    async fn test_sequential_appends_keep_order_and_timestamps() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let session = store.create_session().await.unwrap();

        for i in 0..5 {
            let role = if i % 2 == 0 {
                Role::User
            } else {
                Role::Assistant
            };
            store
                .append_message(session.id, role, format!("turn {}", i))
                .await
                .unwrap();
        }

        let loaded = store.get_session(session.id).await.unwrap();
        assert_eq!(loaded.messages.len(), 5);
        for (i, msg) in loaded.messages.iter().enumerate() {
            assert_eq!(msg.content, format!("turn {}", i));
            if i > 0 {
                assert!(msg.timestamp >= loaded.messages[i - 1].timestamp);
            }
        }
    }

    #[tokio::test]
    async fn test_append_clamps_backwards_clock() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        // Seed a record whose last message is stamped in the future.
        let mut session = ChatSession::new();
        let mut msg = ChatMessage::user("from the future");
        msg.timestamp = Utc::now() + Duration::hours(1);
        session.messages.push(msg.clone());
        storage.save(&session).await.unwrap();

        let store = SessionStore::new(storage);
        let appended = store
            .append_message(session.id, Role::Assistant, "reply")
            .await
            .unwrap();

        assert!(appended.timestamp >= msg.timestamp);
    }

    #[tokio::test]
    async fn test_concurrent_creates_yield_distinct_sessions() {
        let dir = tempdir().unwrap();
        let store = Arc::new(store_in(dir.path()));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(
                async move { store.create_session().await.unwrap() },
            ));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().id);
        }
        assert_eq!(ids.len(), 16);

        let summaries = store.list_sessions().await.unwrap();
        assert_eq!(summaries.len(), 16);
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let dir = tempdir().unwrap();
        let store = Arc::new(store_in(dir.path()));
        let session = store.create_session().await.unwrap();

        let mut handles = Vec::new();
        for task in 0..4 {
            let store = store.clone();
            let id = session.id;
            handles.push(tokio::spawn(async move {
                for i in 0..5 {
                    store
                        .append_message(id, Role::User, format!("task {} msg {}", task, i))
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = store.get_session(session.id).await.unwrap();
        assert_eq!(loaded.messages.len(), 20);

        let unique: HashSet<_> = loaded.messages.iter().map(|m| m.content.clone()).collect();
        assert_eq!(unique.len(), 20);
    }

    #[tokio::test]
    async fn test_append_exchange_commits_pair_in_order() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        let session = store.create_session().await.unwrap();

        let (user, assistant) = store
            .append_exchange(session.id, "What does Doc X say?", "Doc X says Y.")
            .await
            .unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(assistant.role, Role::Assistant);
        assert!(assistant.timestamp >= user.timestamp);

        let loaded = store.get_session(session.id).await.unwrap();
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.messages[0].content, "What does Doc X say?");
        assert_eq!(loaded.messages[1].content, "Doc X says Y.");
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        let base = Utc::now();
        let mut expected = Vec::new();
        for offset in [1, 2, 3] {
            let mut session = ChatSession::new();
            session.created_at = base + Duration::seconds(offset);
            storage.save(&session).await.unwrap();
            expected.push(session.id);
        }
        expected.reverse(); // newest first

        let store = SessionStore::new(storage);
        let summaries = store.list_sessions().await.unwrap();
        let listed: Vec<Uuid> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_list_sessions_skips_corrupt_records() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let kept = store.create_session().await.unwrap();
        std::fs::write(
            dir.path().join(format!("{}.json", Uuid::new_v4())),
            "{ this is not json",
        )
        .unwrap();

        let summaries = store.list_sessions().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_round_trip_unaffected_by_other_sessions() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let session = store.create_session().await.unwrap();
        store
            .append_exchange(session.id, "q1", "a1")
            .await
            .unwrap();

        for _ in 0..5 {
            let other = store.create_session().await.unwrap();
            store.append_message(other.id, Role::User, "noise").await.unwrap();
        }

        let loaded = store.get_session(session.id).await.unwrap();
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.messages[0].content, "q1");
        assert_eq!(loaded.messages[1].content, "a1");
    }
}
