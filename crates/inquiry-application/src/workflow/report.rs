//! Report settings, generation and rendering.

use super::{InFlight, Outcome, WorkflowController};
use inquiry_core::error::Result;
use inquiry_core::report::{ReportSettings, compose, filter_sections};

impl WorkflowController {
    pub async fn update_report_settings(&self, settings: ReportSettings) -> Result<()> {
        self.edit("update_report_settings", false, |s| {
            s.report_settings = settings;
            Ok(())
        })
        .await
    }

    /// Turns automatic recomposition on or off. Turning it on recomposes
    /// right away.
    pub async fn set_auto_update(&self, enabled: bool) -> Result<()> {
        self.edit("set_auto_update", enabled, |s| {
            s.auto_update_report = enabled;
            Ok(())
        })
        .await
    }

    /// Produces the report for the current session and stores it.
    ///
    /// Without retrieval augmentation the report is composed locally and the
    /// call never waits. With it, the report collaborator receives the full
    /// session payload; a failure leaves the stored report and the view as
    /// they were.
    ///
    /// # Errors
    ///
    /// `TransitionInFlight` while another collaborator-backed generation is
    /// pending.
    pub async fn generate_report(&self) -> Result<Outcome<String>> {
        let use_rag = {
            let state = self.state.read().await;
            state.session("generate_report")?.report_settings.use_rag
        };
        if !use_rag {
            return self
                .edit("generate_report", false, |session| {
                    session.generated_report = compose(session, &session.report_settings);
                    Ok(session.generated_report.clone())
                })
                .await
                .map(Outcome::Applied);
        }

        let _flight = InFlight::acquire(&self.report_in_flight, "report")?;
        let (request, ticket) = {
            let state = self.state.read().await;
            let session = state.session("generate_report")?;
            (session.report_request(), state.ticket())
        };

        tracing::info!(research_id = %request.research_id, "Requesting generated report");
        let report = self
            .collaborators
            .report_generator
            .generate_report(&request)
            .await
            .and_then(|r| r.validate())
            .map_err(|e| {
                tracing::warn!(research_id = %request.research_id, error = %e, "Report generation failed");
                e
            })?;

        self.apply_response(&ticket, "generate_report", |session| {
            session.generated_report = report.report.clone();
            Ok(report.report)
        })
        .await
    }

    /// Replaces the stored report with text edited by the user.
    pub async fn edit_report(&self, text: &str) -> Result<()> {
        self.edit("edit_report", false, |s| {
            s.generated_report = text.to_string();
            Ok(())
        })
        .await
    }

    /// The stored report reduced to the sections the current settings
    /// include.
    pub async fn rendered_report(&self) -> Result<String> {
        let state = self.state.read().await;
        let session = state.session("rendered_report")?;
        Ok(filter_sections(&session.generated_report, &session.report_settings))
    }
}
