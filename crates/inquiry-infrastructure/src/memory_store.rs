//! In-memory stores.
//!
//! Backing stores for controller tests.

use async_trait::async_trait;
use inquiry_core::error::Result;
use inquiry_core::recent::{RecentTopics, RecentTopicsRepository};
use inquiry_core::session::{ResearchId, ResearchSession, SessionStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<ResearchId, ResearchSession>>,
    active: RwLock<Option<ResearchId>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &ResearchId) -> Result<Option<ResearchSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: &ResearchSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn remove(&self, id: &ResearchId) -> Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn active_session_id(&self) -> Result<Option<ResearchId>> {
        Ok(self.active.read().await.clone())
    }

    async fn set_active_session_id(&self, id: &ResearchId) -> Result<()> {
        *self.active.write().await = Some(id.clone());
        Ok(())
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        *self.active.write().await = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryRecentTopicsRepository {
    topics: RwLock<RecentTopics>,
}

impl MemoryRecentTopicsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecentTopicsRepository for MemoryRecentTopicsRepository {
    async fn load(&self) -> Result<RecentTopics> {
        Ok(self.topics.read().await.clone())
    }

    async fn save(&self, topics: &RecentTopics) -> Result<()> {
        *self.topics.write().await = topics.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inquiry_core::report::ReportSettings;

    #[tokio::test]
    async fn test_save_replaces_previous_snapshot() {
        let store = MemorySessionStore::new();
        let mut session = ResearchSession::new(
            ResearchId::mint(),
            "Topic",
            vec!["g".to_string()],
            vec!["t".to_string()],
            ReportSettings::default(),
            false,
        );
        store.save(&session).await.unwrap();
        session.goals = vec!["changed".to_string()];
        store.save(&session).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.load(&session.id).await.unwrap().unwrap().goals, ["changed"]);
    }
}
