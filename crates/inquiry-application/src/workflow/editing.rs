//! User edits of goals, tasks, notes, analysis and recommendations.
//!
//! Every method commits a single discrete edit: the session is updated, a
//! snapshot is queued and, for notes and analysis edits, the report is
//! recomposed once when auto-update is on.

use super::{Outcome, WorkflowController};
use inquiry_core::collaborator::validate_recommendations;
use inquiry_core::error::Result;
use inquiry_core::session::{AnalysisField, Priority};

impl WorkflowController {
    pub async fn set_goals(&self, goals: Vec<String>) -> Result<()> {
        self.edit("set_goals", false, |s| s.set_goals(goals)).await
    }

    pub async fn set_tasks(&self, tasks: Vec<String>) -> Result<()> {
        self.edit("set_tasks", false, |s| s.set_tasks(tasks)).await
    }

    // ============================================================================
    // Notes
    // ============================================================================

    pub async fn set_notes(&self, category_id: &str, content: &str) -> Result<()> {
        self.edit("set_notes", true, |s| s.set_notes(category_id, content))
            .await
    }

    /// Adds a notes category and returns its id.
    pub async fn add_notes_category(&self, name: &str) -> Result<String> {
        self.edit("add_notes_category", true, |s| s.add_notes_category(name))
            .await
    }

    pub async fn rename_notes_category(&self, category_id: &str, name: &str) -> Result<()> {
        self.edit("rename_notes_category", true, |s| {
            s.rename_notes_category(category_id, name)
        })
        .await
    }

    /// Deletes a category with its content. `general` cannot be deleted.
    pub async fn delete_notes_category(&self, category_id: &str) -> Result<()> {
        self.edit("delete_notes_category", true, |s| {
            s.delete_notes_category(category_id)
        })
        .await
    }

    pub async fn select_notes_category(&self, category_id: &str) -> Result<()> {
        self.edit("select_notes_category", false, |s| {
            s.select_notes_category(category_id)
        })
        .await
    }

    // ============================================================================
    // Analysis
    // ============================================================================

    pub async fn add_key_term(&self, term: &str, definition: &str) -> Result<String> {
        self.edit("add_key_term", true, |s| s.add_key_term(term, definition))
            .await
    }

    pub async fn update_key_term(&self, id: &str, term: &str, definition: &str) -> Result<()> {
        self.edit("update_key_term", true, |s| {
            s.update_key_term(id, term, definition)
        })
        .await
    }

    pub async fn remove_key_term(&self, id: &str) -> Result<()> {
        self.edit("remove_key_term", true, |s| s.remove_key_term(id))
            .await
    }

    pub async fn add_approach(&self, name: &str, description: &str) -> Result<String> {
        self.edit("add_approach", true, |s| s.add_approach(name, description))
            .await
    }

    pub async fn update_approach(&self, id: &str, name: &str, description: &str) -> Result<()> {
        self.edit("update_approach", true, |s| {
            s.update_approach(id, name, description)
        })
        .await
    }

    pub async fn remove_approach(&self, id: &str) -> Result<()> {
        self.edit("remove_approach", true, |s| s.remove_approach(id))
            .await
    }

    pub async fn set_analysis_text(&self, field: AnalysisField, text: &str) -> Result<()> {
        self.edit("set_analysis_text", true, |s| {
            s.set_analysis_text(field, text);
            Ok(())
        })
        .await
    }

    pub async fn set_comparison(&self, text: &str) -> Result<()> {
        self.set_analysis_text(AnalysisField::Comparison, text).await
    }

    pub async fn set_strengths(&self, text: &str) -> Result<()> {
        self.set_analysis_text(AnalysisField::Strengths, text).await
    }

    pub async fn set_weaknesses(&self, text: &str) -> Result<()> {
        self.set_analysis_text(AnalysisField::Weaknesses, text).await
    }

    pub async fn set_own_position(&self, text: &str) -> Result<()> {
        self.set_analysis_text(AnalysisField::OwnPosition, text).await
    }

    // ============================================================================
    // Recommendations
    // ============================================================================

    pub async fn add_recommendation(&self, text: &str, priority: Priority) -> Result<String> {
        self.edit("add_recommendation", false, |s| {
            s.add_recommendation(text, priority)
        })
        .await
    }

    pub async fn update_recommendation(&self, id: &str, text: &str, priority: Priority) -> Result<()> {
        self.edit("update_recommendation", false, |s| {
            s.update_recommendation(id, text, priority)
        })
        .await
    }

    pub async fn remove_recommendation(&self, id: &str) -> Result<()> {
        self.edit("remove_recommendation", false, |s| s.remove_recommendation(id))
            .await
    }

    /// Replaces the recommendations with ones proposed by the report
    /// collaborator. A failure leaves the current list and view as they were.
    pub async fn generate_recommendations(&self) -> Result<Outcome<usize>> {
        let (request, ticket) = {
            let state = self.state.read().await;
            let session = state.session("generate_recommendations")?;
            (session.recommendation_request(), state.ticket())
        };

        let proposed = self
            .collaborators
            .report_generator
            .generate_recommendations(&request)
            .await
            .and_then(validate_recommendations)
            .map_err(|e| {
                tracing::warn!(error = %e, "Recommendation generation failed");
                e
            })?;

        self.apply_response(&ticket, "generate_recommendations", |session| {
            session.replace_recommendations(proposed);
            Ok(session.recommendations.len())
        })
        .await
    }
}
