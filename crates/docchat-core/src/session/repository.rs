//! Session archive trait.
//!
//! Defines the storage seam for archived sessions.

use async_trait::async_trait;

use super::model::{SessionId, SessionRecord};
use crate::error::Result;

/// Storage for archived sessions, keyed by session id.
///
/// The bundled implementation keeps everything in memory for the lifetime of
/// the process; a durable store can be substituted without touching the
/// session store or the controllers.
///
/// # Implementation Notes
///
/// - `set` must refuse empty records with a validation error; every archived
///   session holds at least one entry.
/// - `delete` of an unknown id is not an error.
#[async_trait]
pub trait SessionArchive: Send + Sync {
    /// Finds an archived session.
    ///
    /// - `Ok(Some(record))`: found
    /// - `Ok(None)`: no such session
    async fn get(&self, id: &SessionId) -> Result<Option<SessionRecord>>;

    /// Inserts or replaces the record stored under `record.id`.
    async fn set(&self, record: &SessionRecord) -> Result<()>;

    /// Removes a session. Returns whether it was present.
    async fn delete(&self, id: &SessionId) -> Result<bool>;

    /// All archived sessions, in no particular order.
    async fn list(&self) -> Result<Vec<SessionRecord>>;

    /// Removes every session. Returns how many were removed.
    async fn clear(&self) -> Result<usize>;

    async fn contains(&self, id: &SessionId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
