//! Session store trait.
//!
//! Defines the interface for durable research session snapshots.

use super::id::ResearchId;
use super::model::ResearchSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract store for research session snapshots.
///
/// Holds at most one snapshot per research id. Implementations must make
/// `save` atomic from the caller's point of view: a subsequent `load` sees
/// either the previous snapshot or the new one, never a partial write.
///
/// # Implementation Notes
///
/// The store also tracks which session is current, so that a restarted
/// process can rehydrate it.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the snapshot for `id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: Snapshot found
    /// - `Ok(None)`: No snapshot for this id
    /// - `Err(_)`: Snapshot exists but could not be read
    async fn load(&self, id: &ResearchId) -> Result<Option<ResearchSession>>;

    /// Writes a full snapshot, replacing any previous one for the same id.
    async fn save(&self, session: &ResearchSession) -> Result<()>;

    /// Deletes the snapshot for `id`. Removing a missing snapshot succeeds.
    async fn remove(&self, id: &ResearchId) -> Result<()>;

    /// Gets the id of the current session, if any.
    async fn active_session_id(&self) -> Result<Option<ResearchId>>;

    /// Marks `id` as the current session.
    async fn set_active_session_id(&self, id: &ResearchId) -> Result<()>;

    /// Forgets the current session pointer.
    async fn clear_active_session_id(&self) -> Result<()>;
}
