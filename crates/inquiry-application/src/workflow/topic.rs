//! Topic submission, topic choice and plan generation.

use super::{InFlight, Outcome, WorkflowController};
use inquiry_core::collaborator::ResearchPlan;
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::report::ReportSettings;
use inquiry_core::session::{CandidateTopic, ResearchId, ResearchSession};
use inquiry_core::workflow::{ResearchTab, View};

/// Which wording of the candidate topic the user committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopicChoice {
    Original,
    Suggested,
}

impl WorkflowController {
    /// Submits a topic for refinement.
    ///
    /// On success the controller enters `AwaitingTopicChoice` with the
    /// original and refined wording stored as the candidate topic. A failed
    /// refinement leaves the controller in `Search`.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank topic or missing credentials
    /// - `TransitionInFlight` while another topic flow is pending
    /// - `InvalidTransition` outside of `Search`
    /// - `Collaborator` when refinement fails
    pub async fn submit_topic(&self, topic: &str) -> Result<Outcome<CandidateTopic>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(InquiryError::validation("topic must not be empty"));
        }
        let _flight = InFlight::acquire(&self.topic_flow_in_flight, "topic")?;

        let ticket = {
            let state = self.state.read().await;
            if state.view != View::Search {
                return Err(InquiryError::invalid_transition(&state.view, "submit_topic"));
            }
            state.ticket()
        };
        let credentials = self.credentials().await?;
        self.record_recent_topic(topic).await;

        tracing::info!(topic, "Refining research topic");
        let refined = self
            .collaborators
            .topic_refiner
            .refine_topic(topic, &credentials)
            .await
            .and_then(|r| r.validate())
            .map_err(|e| {
                tracing::warn!(error = %e, "Topic refinement failed");
                InquiryError::from(e)
            })?;

        let mut state = self.state.write().await;
        if !state.is_current(&ticket) || state.view != View::Search {
            tracing::debug!(topic, "Dropping refinement for an abandoned search");
            return Ok(Outcome::Discarded);
        }
        let candidate = CandidateTopic {
            original: topic.to_string(),
            suggested: refined.refined_topic.trim().to_string(),
        };
        state.candidate = Some(candidate.clone());
        state.view = View::AwaitingTopicChoice;
        tracing::debug!(view = %state.view, "Topic refined");
        Ok(Outcome::Applied(candidate))
    }

    /// Commits the topic as the user typed it and generates the plan.
    pub async fn keep_original(&self) -> Result<Outcome<ResearchId>> {
        self.commit_topic(TopicChoice::Original).await
    }

    /// Commits the refined topic and generates the plan.
    pub async fn use_suggested(&self) -> Result<Outcome<ResearchId>> {
        self.commit_topic(TopicChoice::Suggested).await
    }

    /// Leaves topic choice without committing anything.
    pub async fn cancel_topic_choice(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if state.view != View::AwaitingTopicChoice {
            return Err(InquiryError::invalid_transition(&state.view, "cancel_topic_choice"));
        }
        state.candidate = None;
        state.view = View::Search;
        Ok(())
    }

    /// Commits the chosen topic once the plan collaborator has answered.
    ///
    /// The same topic as the current session keeps its id and only replaces
    /// goals and tasks. A different topic starts a fresh session under a
    /// newly minted id. A failed plan call moves to `Error`, drops the
    /// candidate and leaves the current session untouched.
    async fn commit_topic(&self, choice: TopicChoice) -> Result<Outcome<ResearchId>> {
        let action = match choice {
            TopicChoice::Original => "keep_original",
            TopicChoice::Suggested => "use_suggested",
        };
        let _flight = InFlight::acquire(&self.topic_flow_in_flight, "topic")?;

        let (topic, ticket) = {
            let state = self.state.read().await;
            let candidate = match (&state.view, &state.candidate) {
                (View::AwaitingTopicChoice, Some(candidate)) => candidate,
                _ => return Err(InquiryError::invalid_transition(&state.view, action)),
            };
            let topic = match choice {
                TopicChoice::Original => candidate.original.clone(),
                TopicChoice::Suggested => candidate.suggested.clone(),
            };
            (topic, state.ticket())
        };
        let credentials = self.credentials().await?;

        tracing::info!(topic = %topic, action, "Generating research plan");
        let plan = self
            .collaborators
            .plan_generator
            .generate_plan(&topic, &credentials)
            .await
            .and_then(ResearchPlan::validate);

        let mut state = self.state.write().await;
        if !state.is_current(&ticket) || state.view != View::AwaitingTopicChoice {
            tracing::debug!(topic = %topic, "Dropping plan for an abandoned topic choice");
            return Ok(Outcome::Discarded);
        }

        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!(error = %e, "Plan generation failed");
                state.candidate = None;
                state.view = View::Error {
                    message: format!("Failed to generate a research plan: {e}"),
                };
                return Err(e.into());
            }
        };

        let same_topic = state.session.as_ref().is_some_and(|s| s.topic == topic);
        let research_id = if same_topic {
            let session = state.session_mut(action)?;
            let mut draft = session.clone();
            draft.replace_plan(plan.goals, plan.tasks);
            draft.touch();
            *session = draft;
            self.persistence.save(session);
            self.persistence.set_active(&session.id);
            session.id.clone()
        } else {
            let session = self.new_session(topic, plan);
            if let Some(previous) = state.session.as_ref() {
                tracing::info!(research_id = %previous.id, "Replacing research session");
                self.persistence.remove(&previous.id);
            }
            self.persistence.save(&session);
            self.persistence.set_active(&session.id);
            let id = session.id.clone();
            state.replace_session(Some(session));
            id
        };

        state.candidate = None;
        state.resume_view = None;
        state.view = View::research(ResearchTab::Notes);
        tracing::info!(research_id = %research_id, "Research topic committed");
        Ok(Outcome::Applied(research_id))
    }

    fn new_session(&self, topic: String, plan: ResearchPlan) -> ResearchSession {
        let defaults = &self.config.report;
        let settings = ReportSettings {
            language: defaults.default_language,
            style: defaults.default_style,
            ..ReportSettings::default()
        };
        ResearchSession::new(
            ResearchId::mint(),
            topic,
            plan.goals,
            plan.tasks,
            settings,
            defaults.auto_update,
        )
    }

    /// Asks the plan collaborator again for the current topic and replaces
    /// goals and tasks wholesale. The session id is kept.
    ///
    /// A failure moves to `Error` with the session unchanged.
    pub async fn regenerate_plan(&self) -> Result<Outcome<()>> {
        let _flight = InFlight::acquire(&self.topic_flow_in_flight, "topic")?;
        let (topic, ticket) = {
            let state = self.state.read().await;
            let session = state.session("regenerate_plan")?;
            if !state.view.needs_session() {
                return Err(InquiryError::invalid_transition(&state.view, "regenerate_plan"));
            }
            (session.topic.clone(), state.ticket())
        };
        let credentials = self.credentials().await?;

        let plan = self
            .collaborators
            .plan_generator
            .generate_plan(&topic, &credentials)
            .await
            .and_then(ResearchPlan::validate);

        match plan {
            Ok(plan) => {
                self.apply_response(&ticket, "regenerate_plan", |session| {
                    session.replace_plan(plan.goals, plan.tasks);
                    Ok(())
                })
                .await
            }
            Err(e) => {
                let mut state = self.state.write().await;
                if !state.is_current(&ticket) {
                    return Ok(Outcome::Discarded);
                }
                tracing::warn!(error = %e, "Plan regeneration failed");
                state.view = View::Error {
                    message: format!("Failed to regenerate the research plan: {e}"),
                };
                Err(e.into())
            }
        }
    }

    async fn record_recent_topic(&self, topic: &str) {
        let result: Result<()> = async {
            let mut recent = self.recent_topics.load().await?;
            recent.record(topic);
            self.recent_topics.save(&recent).await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to record recent topic");
        }
    }
}
