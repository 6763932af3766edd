//! Moving between views, leaving the error view and resetting.

use super::WorkflowController;
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::workflow::{ResearchTab, View};

impl WorkflowController {
    /// Switches between the session views (`Goals`, `Files` and the research
    /// tabs). Edits are committed as they happen, so nothing is lost by
    /// leaving a view.
    pub async fn navigate(&self, target: View) -> Result<()> {
        let mut state = self.state.write().await;
        if state.session.is_none() || !state.view.needs_session() || !target.needs_session() {
            return Err(InquiryError::invalid_transition(&state.view, "navigate"));
        }
        tracing::debug!(from = %state.view, to = %target, "Navigating");
        state.view = target;
        Ok(())
    }

    /// Returns to `Search` without clearing the current session. A pending
    /// topic choice is abandoned.
    pub async fn go_to_search(&self) {
        let mut state = self.state.write().await;
        if state.view.needs_session() {
            state.resume_view = Some(state.view.clone());
        }
        state.candidate = None;
        state.view = View::Search;
    }

    /// Goes back from `Search` to the session that is still current.
    pub async fn resume_research(&self) -> Result<View> {
        let mut state = self.state.write().await;
        if state.view != View::Search || state.session.is_none() {
            return Err(InquiryError::invalid_transition(&state.view, "resume_research"));
        }
        state.view = state
            .resume_view
            .take()
            .unwrap_or_else(|| View::research(ResearchTab::Notes));
        Ok(state.view.clone())
    }

    /// Leaves the error view for the current session, or for `Search` when
    /// there is none.
    pub async fn dismiss_error(&self) -> Result<View> {
        let mut state = self.state.write().await;
        if !matches!(state.view, View::Error { .. }) {
            return Err(InquiryError::invalid_transition(&state.view, "dismiss_error"));
        }
        state.view = if state.session.is_some() {
            View::research(ResearchTab::Notes)
        } else {
            View::Search
        };
        Ok(state.view.clone())
    }

    /// Clears the current session and its snapshot and returns to `Search`.
    ///
    /// Every response still pending is discarded. Without a current session
    /// nothing is written to the store.
    pub async fn reset_research(&self) {
        let mut state = self.state.write().await;
        state.candidate = None;
        state.resume_view = None;
        state.view = View::Search;

        let cleared = state.session.as_ref().map(|s| s.id.clone());
        state.replace_session(None);
        match cleared {
            Some(id) => {
                self.persistence.remove(&id);
                self.persistence.clear_active();
                tracing::info!(research_id = %id, "Research session reset");
            }
            None => tracing::debug!("Reset requested without a current session"),
        }
    }
}
