//! In-memory session archive.
//!
//! History lives until logout or the end of the process; nothing is
//! written to disk.

use std::collections::HashMap;

use async_trait::async_trait;
use docchat_core::error::{DocchatError, Result};
use docchat_core::session::{SessionArchive, SessionId, SessionRecord};
use tokio::sync::RwLock;

/// `SessionArchive` backed by a `HashMap`.
#[derive(Default)]
pub struct InMemorySessionArchive {
    records: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl InMemorySessionArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl SessionArchive for InMemorySessionArchive {
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn set(&self, record: &SessionRecord) -> Result<()> {
        if record.is_empty() {
            return Err(DocchatError::validation(format!(
                "refusing to archive empty session '{}'",
                record.id
            )));
        }

        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record.clone());
        tracing::debug!(session_id = %record.id, entries = record.len(), "Archived session");
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(records.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<SessionRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn clear(&self) -> Result<usize> {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }
}
