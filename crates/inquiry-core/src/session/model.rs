//! Research session aggregate.
//!
//! `ResearchSession` is the single source of truth for everything the user
//! accumulates while researching a topic. All edits go through its methods so
//! that item ids stay unique and invariants (the `general` notes category,
//! monotonic file status) hold no matter which view triggered the change.

use super::analysis::{AnalysisData, AnalysisField, Approach, KeyTerm, Priority, Recommendation};
use super::file::{FileStatus, UploadedFile};
use super::id::ResearchId;
use super::message::{ChatMessage, ChatRole};
use super::notes::{GENERAL_CATEGORY, NotesCategories};
use crate::collaborator::{ChatContext, ProposedRecommendation, RecommendationRequest};
use crate::error::{InquiryError, Result};
use crate::report::{ReportRequest, ReportSettings};
use serde::{Deserialize, Serialize};

/// Topic pair shown while the user chooses between their own wording and the
/// refined suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTopic {
    pub original: String,
    pub suggested: String,
}

/// One research effort, from committed topic to generated report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchSession {
    pub id: ResearchId,
    /// Finalized topic. Changing it means starting a new session.
    pub topic: String,
    pub goals: Vec<String>,
    pub tasks: Vec<String>,
    #[serde(default)]
    pub notes_categories: NotesCategories,
    /// Category the notes editor is showing.
    #[serde(default = "default_active_category")]
    pub active_notes_category: String,
    #[serde(default)]
    pub analysis: AnalysisData,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub chat_transcript: Vec<ChatMessage>,
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFile>,
    #[serde(default)]
    pub report_settings: ReportSettings,
    /// Last composed or generated document. May be stale relative to edits.
    #[serde(default)]
    pub generated_report: String,
    #[serde(default)]
    pub auto_update_report: bool,
    /// Sequence used to mint item ids (`term-3`, `msg-12`, ...).
    #[serde(default)]
    pub item_seq: u64,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
    /// Timestamp of the last committed edit (RFC 3339)
    pub updated_at: String,
}

fn default_active_category() -> String {
    GENERAL_CATEGORY.to_string()
}

impl ResearchSession {
    /// Creates a session for a freshly committed topic and plan.
    ///
    /// Notes categories are named in the language of `report_settings`.
    pub fn new(
        id: ResearchId,
        topic: impl Into<String>,
        goals: Vec<String>,
        tasks: Vec<String>,
        report_settings: ReportSettings,
        auto_update_report: bool,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            topic: topic.into(),
            goals,
            tasks,
            notes_categories: NotesCategories::with_defaults(report_settings.language),
            active_notes_category: default_active_category(),
            analysis: AnalysisData::default(),
            recommendations: Vec::new(),
            chat_transcript: Vec::new(),
            uploaded_files: Vec::new(),
            report_settings,
            generated_report: String::new(),
            auto_update_report,
            item_seq: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Records the time of the latest committed edit.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Mints an item id with the given prefix that is not used anywhere in
    /// the session.
    pub fn next_item_id(&mut self, prefix: &str) -> String {
        loop {
            self.item_seq += 1;
            let candidate = format!("{prefix}-{}", self.item_seq);
            if !self.item_id_in_use(&candidate) {
                return candidate;
            }
        }
    }

    fn item_id_in_use(&self, id: &str) -> bool {
        self.notes_categories.contains(id)
            || self.analysis.key_terms.iter().any(|t| t.id == id)
            || self.analysis.approaches.iter().any(|a| a.id == id)
            || self.recommendations.iter().any(|r| r.id == id)
            || self.chat_transcript.iter().any(|m| m.id == id)
            || self.uploaded_files.iter().any(|f| f.id == id)
    }

    // ============================================================================
    // Goals and tasks
    // ============================================================================

    /// Replaces goals and tasks wholesale.
    pub fn replace_plan(&mut self, goals: Vec<String>, tasks: Vec<String>) {
        self.goals = goals;
        self.tasks = tasks;
    }

    pub fn set_goals(&mut self, goals: Vec<String>) -> Result<()> {
        self.goals = non_empty_entries(goals, "goal")?;
        Ok(())
    }

    pub fn set_tasks(&mut self, tasks: Vec<String>) -> Result<()> {
        self.tasks = non_empty_entries(tasks, "task")?;
        Ok(())
    }

    // ============================================================================
    // Notes
    // ============================================================================

    pub fn set_notes(&mut self, category_id: &str, content: impl Into<String>) -> Result<()> {
        self.notes_categories.set_content(category_id, content)
    }

    pub fn add_notes_category(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InquiryError::validation("category name must not be empty"));
        }
        let id = self.next_item_id("category");
        self.notes_categories.insert(id.clone(), name.to_string())?;
        Ok(id)
    }

    pub fn rename_notes_category(&mut self, category_id: &str, name: &str) -> Result<()> {
        self.notes_categories.rename(category_id, name)
    }

    /// Deletes a category. The editor falls back to `general` if it was
    /// showing the deleted one.
    pub fn delete_notes_category(&mut self, category_id: &str) -> Result<()> {
        self.notes_categories.remove(category_id)?;
        if self.active_notes_category == category_id {
            self.active_notes_category = default_active_category();
        }
        Ok(())
    }

    pub fn select_notes_category(&mut self, category_id: &str) -> Result<()> {
        if !self.notes_categories.contains(category_id) {
            return Err(InquiryError::not_found("NotesCategory", category_id));
        }
        self.active_notes_category = category_id.to_string();
        Ok(())
    }

    // ============================================================================
    // Analysis
    // ============================================================================

    pub fn add_key_term(&mut self, term: &str, definition: &str) -> Result<String> {
        let term = required(term, "term")?;
        let id = self.next_item_id("term");
        self.analysis.key_terms.push(KeyTerm {
            id: id.clone(),
            term,
            definition: definition.trim().to_string(),
        });
        Ok(id)
    }

    pub fn update_key_term(&mut self, id: &str, term: &str, definition: &str) -> Result<()> {
        let term = required(term, "term")?;
        let entry = self
            .analysis
            .key_terms
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| InquiryError::not_found("KeyTerm", id))?;
        entry.term = term;
        entry.definition = definition.trim().to_string();
        Ok(())
    }

    pub fn remove_key_term(&mut self, id: &str) -> Result<()> {
        let before = self.analysis.key_terms.len();
        self.analysis.key_terms.retain(|t| t.id != id);
        if self.analysis.key_terms.len() == before {
            return Err(InquiryError::not_found("KeyTerm", id));
        }
        Ok(())
    }

    pub fn add_approach(&mut self, name: &str, description: &str) -> Result<String> {
        let name = required(name, "approach name")?;
        let id = self.next_item_id("approach");
        self.analysis.approaches.push(Approach {
            id: id.clone(),
            name,
            description: description.trim().to_string(),
        });
        Ok(id)
    }

    pub fn update_approach(&mut self, id: &str, name: &str, description: &str) -> Result<()> {
        let name = required(name, "approach name")?;
        let entry = self
            .analysis
            .approaches
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| InquiryError::not_found("Approach", id))?;
        entry.name = name;
        entry.description = description.trim().to_string();
        Ok(())
    }

    pub fn remove_approach(&mut self, id: &str) -> Result<()> {
        let before = self.analysis.approaches.len();
        self.analysis.approaches.retain(|a| a.id != id);
        if self.analysis.approaches.len() == before {
            return Err(InquiryError::not_found("Approach", id));
        }
        Ok(())
    }

    pub fn set_analysis_text(&mut self, field: AnalysisField, text: impl Into<String>) {
        *self.analysis.field_mut(field) = text.into();
    }

    // ============================================================================
    // Recommendations
    // ============================================================================

    pub fn add_recommendation(&mut self, text: &str, priority: Priority) -> Result<String> {
        let text = required(text, "recommendation")?;
        let id = self.next_item_id("rec");
        self.recommendations.push(Recommendation {
            id: id.clone(),
            text,
            priority,
        });
        Ok(id)
    }

    pub fn update_recommendation(&mut self, id: &str, text: &str, priority: Priority) -> Result<()> {
        let text = required(text, "recommendation")?;
        let entry = self
            .recommendations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| InquiryError::not_found("Recommendation", id))?;
        entry.text = text;
        entry.priority = priority;
        Ok(())
    }

    pub fn remove_recommendation(&mut self, id: &str) -> Result<()> {
        let before = self.recommendations.len();
        self.recommendations.retain(|r| r.id != id);
        if self.recommendations.len() == before {
            return Err(InquiryError::not_found("Recommendation", id));
        }
        Ok(())
    }

    /// Replaces the list with collaborator proposals, skipping blank ones.
    pub fn replace_recommendations(&mut self, proposed: Vec<ProposedRecommendation>) {
        self.recommendations.clear();
        for rec in proposed {
            let text = rec.text.trim();
            if text.is_empty() {
                continue;
            }
            let id = self.next_item_id("rec");
            self.recommendations.push(Recommendation {
                id,
                text: text.to_string(),
                priority: rec.priority,
            });
        }
    }

    // ============================================================================
    // Chat and files
    // ============================================================================

    pub fn push_chat_message(&mut self, role: ChatRole, content: impl Into<String>) -> String {
        let id = self.next_item_id("msg");
        self.chat_transcript.push(ChatMessage {
            id: id.clone(),
            role,
            content: content.into(),
        });
        id
    }

    pub fn file(&self, file_id: &str) -> Option<&UploadedFile> {
        self.uploaded_files.iter().find(|f| f.id == file_id)
    }

    pub fn file_mut(&mut self, file_id: &str) -> Result<&mut UploadedFile> {
        self.uploaded_files
            .iter_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| InquiryError::not_found("UploadedFile", file_id))
    }

    pub fn set_file_status(&mut self, file_id: &str, status: FileStatus) -> Result<()> {
        self.file_mut(file_id)?.transition(status)
    }

    pub fn remove_file(&mut self, file_id: &str) -> Result<()> {
        let before = self.uploaded_files.len();
        self.uploaded_files.retain(|f| f.id != file_id);
        if self.uploaded_files.len() == before {
            return Err(InquiryError::not_found("UploadedFile", file_id));
        }
        Ok(())
    }

    // ============================================================================
    // Collaborator payloads
    // ============================================================================

    pub fn chat_context(&self) -> ChatContext {
        ChatContext {
            research_id: self.id.clone(),
            topic: self.topic.clone(),
            goals: self.goals.clone(),
            tasks: self.tasks.clone(),
            history: self.chat_transcript.clone(),
        }
    }

    pub fn report_request(&self) -> ReportRequest {
        ReportRequest {
            research_id: self.id.clone(),
            topic: self.topic.clone(),
            goals: self.goals.clone(),
            tasks: self.tasks.clone(),
            notes: self.notes_categories.joined_text(),
            recommendations: self.recommendations.iter().map(|r| r.text.clone()).collect(),
            analysis: self.analysis.clone(),
            settings: self.report_settings.clone(),
        }
    }

    pub fn recommendation_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            research_id: self.id.clone(),
            topic: self.topic.clone(),
            goals: self.goals.clone(),
            tasks: self.tasks.clone(),
            notes: self.notes_categories.joined_text(),
            key_terms: self.analysis.key_terms.clone(),
            approaches: self.analysis.approaches.clone(),
        }
    }
}

fn required(value: &str, what: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InquiryError::validation(format!("{what} must not be empty")));
    }
    Ok(value.to_string())
}

fn non_empty_entries(entries: Vec<String>, what: &str) -> Result<Vec<String>> {
    let entries: Vec<String> = entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(InquiryError::validation(format!(
            "at least one {what} is required"
        )));
    }
    Ok(entries)
}
