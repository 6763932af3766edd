//! Recently submitted topics.
//!
//! Kept as its own record, independent of any research session.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const MAX_RECENT_TOPICS: usize = 5;

/// Most-recent-first list of distinct topics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecentTopics {
    #[serde(default)]
    topics: Vec<String>,
}

impl RecentTopics {
    pub fn new(topics: Vec<String>) -> Self {
        let mut recent = Self::default();
        for topic in topics.into_iter().rev() {
            recent.record(&topic);
        }
        recent
    }

    /// Moves `topic` to the front, dropping duplicates and the oldest entry
    /// beyond the limit. Blank topics are ignored.
    pub fn record(&mut self, topic: &str) {
        let topic = topic.trim();
        if topic.is_empty() {
            return;
        }
        self.topics.retain(|t| t != topic);
        self.topics.insert(0, topic.to_string());
        self.topics.truncate(MAX_RECENT_TOPICS);
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

/// Durable storage for the recent topics record.
#[async_trait]
pub trait RecentTopicsRepository: Send + Sync {
    /// Loads the list; a missing record is an empty list.
    async fn load(&self) -> Result<RecentTopics>;

    async fn save(&self, topics: &RecentTopics) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_most_recent_first_and_deduplicated() {
        let mut recent = RecentTopics::default();
        recent.record("a");
        recent.record("b");
        recent.record("a");
        assert_eq!(recent.topics(), ["a", "b"]);
    }

    #[test]
    fn test_record_keeps_at_most_five() {
        let mut recent = RecentTopics::default();
        for i in 0..8 {
            recent.record(&format!("topic {i}"));
        }
        assert_eq!(recent.topics().len(), MAX_RECENT_TOPICS);
        assert_eq!(recent.topics()[0], "topic 7");
        assert_eq!(recent.topics()[4], "topic 3");
    }

    #[test]
    fn test_new_normalizes_loaded_list() {
        let recent = RecentTopics::new(vec![
            "x".to_string(),
            "y".to_string(),
            "x".to_string(),
            " ".to_string(),
        ]);
        assert_eq!(recent.topics(), ["x", "y"]);
    }
}
