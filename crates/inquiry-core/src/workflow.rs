//! Views of the research workflow.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Child views of the research stage. Any of them can be entered from any
/// other at any time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResearchTab {
    #[default]
    Notes,
    Analysis,
    Assistant,
    Report,
}

/// The view the user is currently in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Topic entry. Initial view.
    #[default]
    Search,
    /// Choosing between the original topic and the refined suggestion.
    AwaitingTopicChoice,
    /// Goals and tasks of the current session.
    Goals,
    /// Uploaded documents.
    Files,
    Research { tab: ResearchTab },
    /// A topic commit or plan generation failed.
    Error { message: String },
}

impl View {
    pub fn research(tab: ResearchTab) -> Self {
        View::Research { tab }
    }

    /// Views that require a current session.
    pub fn needs_session(&self) -> bool {
        matches!(self, View::Goals | View::Files | View::Research { .. })
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Search => write!(f, "search"),
            View::AwaitingTopicChoice => write!(f, "awaiting-topic-choice"),
            View::Goals => write!(f, "goals"),
            View::Files => write!(f, "files"),
            View::Research { tab } => write!(f, "research/{tab}"),
            View::Error { .. } => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(View::research(ResearchTab::Assistant).to_string(), "research/assistant");
        assert_eq!(View::AwaitingTopicChoice.to_string(), "awaiting-topic-choice");
    }

    #[test]
    fn test_needs_session() {
        assert!(View::Files.needs_session());
        assert!(!View::Search.needs_session());
        assert!(!View::Error { message: "x".into() }.needs_session());
    }
}
