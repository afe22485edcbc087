//! Session storage trait and the file-backed implementation

use crate::error::{Result, SessionError};
use async_trait::async_trait;
use chat_core::ChatSession;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Pluggable persistence for session records.
///
/// A record is always written wholesale; partial updates are the concern of
/// [`crate::SessionStore`], which serializes them per session.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Load a session record.
    async fn load(&self, id: Uuid) -> Result<ChatSession>;

    /// Persist a session record, replacing any previous version.
    async fn save(&self, session: &ChatSession) -> Result<()>;

    /// Ids of every stored session, in no particular order.
    async fn list_ids(&self) -> Result<Vec<Uuid>>;
}

/// File-based session storage: one pretty-printed JSON file per session.
#[derive(Clone)]
pub struct FileSessionStorage {
    base_dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, id: Uuid) -> PathBuf {
        self.base_dir.join(format!("{}.json", id))
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self, id: Uuid) -> Result<ChatSession> {
        let path = self.session_path(id);

        if !path.exists() {
            return Err(SessionError::NotFound);
        }

        let contents = fs::read_to_string(&path).await?;
        let session: ChatSession = serde_json::from_str(&contents)?;

        Ok(session)
    }

    async fn save(&self, session: &ChatSession) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;

        let path = self.session_path(session.id);
        let contents = serde_json::to_string_pretty(session)?;

        // Write-then-rename so a reader sees the old record or the new one,
        // never a torn write.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(
            session_id = %session.id,
            message_count = session.messages.len(),
            "session record persisted"
        );

        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<Uuid>> {
        let mut ids = Vec::new();
        if !self.base_dir.exists() {
            return Ok(ids);
        }

        let mut entries = fs::read_dir(&self.base_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(id) = Uuid::parse_str(stem) {
                    ids.push(id);
                }
            }
        }

        Ok(ids)
    }
}
