//! File-based recent topics record.

use crate::paths::InquiryPaths;
use crate::storage::AtomicFile;
use async_trait::async_trait;
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::recent::{RecentTopics, RecentTopicsRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// Stores recent topics in `recent_topics.json`, independent of sessions.
pub struct FileRecentTopicsRepository {
    file: Arc<AtomicFile<RecentTopics>>,
}

impl FileRecentTopicsRepository {
    pub fn new(paths: &InquiryPaths) -> Self {
        Self::at(paths.recent_topics_file())
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::json(path)),
        }
    }
}

#[async_trait]
impl RecentTopicsRepository for FileRecentTopicsRepository {
    async fn load(&self) -> Result<RecentTopics> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| InquiryError::internal(format!("Failed to join blocking task: {}", e)))??;
        // Normalize in case the file was edited by hand.
        Ok(loaded
            .map(|topics| RecentTopics::new(topics.topics().to_vec()))
            .unwrap_or_default())
    }

    async fn save(&self, topics: &RecentTopics) -> Result<()> {
        let file = self.file.clone();
        let topics = topics.clone();
        tokio::task::spawn_blocking(move || file.save(&topics))
            .await
            .map_err(|e| InquiryError::internal(format!("Failed to join blocking task: {}", e)))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileRecentTopicsRepository::at(temp_dir.path().join("recent.json"));
        assert!(repo.load().await.unwrap().topics().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileRecentTopicsRepository::at(temp_dir.path().join("recent.json"));
        let mut topics = RecentTopics::default();
        topics.record("first");
        topics.record("second");

        repo.save(&topics).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), topics);
    }

    #[tokio::test]
    async fn test_hand_edited_file_is_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recent.json");
        std::fs::write(&path, r#"{"topics": ["a", "b", "a", "c", "d", "e", "f"]}"#).unwrap();
        let loaded = FileRecentTopicsRepository::at(path).load().await.unwrap();
        assert_eq!(loaded.topics(), ["a", "b", "c", "d", "e"]);
    }
}
