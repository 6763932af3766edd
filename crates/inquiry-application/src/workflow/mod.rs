//! WorkflowController - the research workflow state machine.
//!
//! The controller exclusively owns the current [`ResearchSession`] and the
//! current [`View`]. Every mutation happens under one write lock and is
//! enqueued on the [`PersistenceQueue`] before the lock is released, so the
//! durable order of snapshots always matches the order of edits.
//!
//! Collaborator calls are made without holding the lock. Each call captures a
//! [`RequestTicket`]; when the response arrives and the session it was issued
//! for has since been replaced or cleared, the response is dropped and the
//! call returns [`Outcome::Discarded`].

mod assistant;
mod editing;
mod files;
mod navigation;
mod report;
mod topic;

use crate::persistence::PersistenceQueue;
use inquiry_core::collaborator::{
    ChatAssistant, FileService, PlanGenerator, ReportGenerator, TopicRefiner,
};
use inquiry_core::config::{AppConfig, Credentials};
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::recent::RecentTopicsRepository;
use inquiry_core::report::compose;
use inquiry_core::secret::SecretService;
use inquiry_core::session::{CandidateTopic, ResearchId, ResearchSession, SessionStore};
use inquiry_core::workflow::{ResearchTab, View};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// The set of collaborators the workflow talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub topic_refiner: Arc<dyn TopicRefiner>,
    pub plan_generator: Arc<dyn PlanGenerator>,
    pub chat_assistant: Arc<dyn ChatAssistant>,
    pub file_service: Arc<dyn FileService>,
    pub report_generator: Arc<dyn ReportGenerator>,
}

impl Collaborators {
    /// Uses one backend for every collaborator role.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: TopicRefiner + PlanGenerator + ChatAssistant + FileService + ReportGenerator + 'static,
    {
        Self {
            topic_refiner: backend.clone(),
            plan_generator: backend.clone(),
            chat_assistant: backend.clone(),
            file_service: backend.clone(),
            report_generator: backend,
        }
    }
}

/// Result of an operation that waited on a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The response was applied to the current session.
    Applied(T),
    /// The session changed while the call was pending; nothing was applied.
    Discarded,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Discarded => None,
        }
    }
}

/// Identifies the session a collaborator request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    research_id: Option<ResearchId>,
}

/// Mutable state guarded by the controller's lock.
#[derive(Debug, Default)]
struct WorkflowState {
    view: View,
    session: Option<ResearchSession>,
    candidate: Option<CandidateTopic>,
    /// Bumped whenever the current session is replaced or cleared.
    generation: u64,
    /// View to return to from Search while a session is still current.
    resume_view: Option<View>,
}

impl WorkflowState {
    fn ticket(&self) -> RequestTicket {
        RequestTicket {
            generation: self.generation,
            research_id: self.session.as_ref().map(|s| s.id.clone()),
        }
    }

    fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.generation == ticket.generation
            && self.session.as_ref().map(|s| &s.id) == ticket.research_id.as_ref()
    }

    fn session_mut(&mut self, action: &'static str) -> Result<&mut ResearchSession> {
        let view = self.view.clone();
        self.session
            .as_mut()
            .ok_or_else(|| InquiryError::invalid_transition(view, action))
    }

    fn session(&self, action: &'static str) -> Result<&ResearchSession> {
        self.session
            .as_ref()
            .ok_or_else(|| InquiryError::invalid_transition(&self.view, action))
    }

    /// Replaces the current session, invalidating every pending request.
    fn replace_session(&mut self, session: Option<ResearchSession>) {
        self.session = session;
        self.generation += 1;
    }
}

/// Clears an in-flight flag when the operation holding it ends, including
/// on early return.
#[derive(Debug)]
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, what: &'static str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| InquiryError::TransitionInFlight(what))?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives the research workflow.
pub struct WorkflowController {
    state: RwLock<WorkflowState>,
    store: Arc<dyn SessionStore>,
    recent_topics: Arc<dyn RecentTopicsRepository>,
    secrets: Arc<dyn SecretService>,
    collaborators: Collaborators,
    config: AppConfig,
    persistence: PersistenceQueue,
    topic_flow_in_flight: AtomicBool,
    report_in_flight: AtomicBool,
}

impl WorkflowController {
    /// Creates a controller starting in `Search` with no session.
    ///
    /// Spawns the persistence task, so it must be called inside a tokio
    /// runtime. Call [`bootstrap`](Self::bootstrap) to rehydrate the last
    /// active session.
    pub fn new(
        store: Arc<dyn SessionStore>,
        recent_topics: Arc<dyn RecentTopicsRepository>,
        secrets: Arc<dyn SecretService>,
        collaborators: Collaborators,
        config: AppConfig,
    ) -> Self {
        let persistence = PersistenceQueue::spawn(store.clone());
        Self {
            state: RwLock::new(WorkflowState::default()),
            store,
            recent_topics,
            secrets,
            collaborators,
            config,
            persistence,
            topic_flow_in_flight: AtomicBool::new(false),
            report_in_flight: AtomicBool::new(false),
        }
    }

    /// Rehydrates the last active session, entering `Research(Notes)` when a
    /// snapshot exists and `Search` otherwise.
    ///
    /// Storage failures are logged and leave the controller in `Search`.
    pub async fn bootstrap(&self) -> View {
        let restored = match self.load_active_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to rehydrate the active session");
                None
            }
        };

        let mut state = self.state.write().await;
        match restored {
            Some(session) => {
                tracing::info!(research_id = %session.id, topic = %session.topic, "Rehydrated research session");
                state.replace_session(Some(session));
                state.view = View::research(ResearchTab::Notes);
            }
            None => {
                state.view = View::Search;
            }
        }
        state.view.clone()
    }

    async fn load_active_session(&self) -> Result<Option<ResearchSession>> {
        let Some(id) = self.store.active_session_id().await? else {
            return Ok(None);
        };
        let session = self.store.load(&id).await?;
        if session.is_none() {
            tracing::warn!(research_id = %id, "Active session pointer has no snapshot; clearing it");
            self.persistence.clear_active();
        }
        Ok(session)
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub async fn view(&self) -> View {
        self.state.read().await.view.clone()
    }

    /// Copy of the current session, if any.
    pub async fn snapshot(&self) -> Option<ResearchSession> {
        self.state.read().await.session.clone()
    }

    pub async fn candidate_topic(&self) -> Option<CandidateTopic> {
        self.state.read().await.candidate.clone()
    }

    /// Most-recent-first list of submitted topics.
    pub async fn recent_topics(&self) -> Result<Vec<String>> {
        Ok(self.recent_topics.load().await?.topics().to_vec())
    }

    /// An outstanding persistence failure: a snapshot that has not been
    /// written since its last failed attempt, or a failed pointer write.
    pub fn last_persistence_error(&self) -> Option<InquiryError> {
        self.persistence.last_error()
    }

    /// Waits until every edit made so far has reached the store.
    pub async fn flush(&self) {
        self.persistence.flush().await;
    }

    // ============================================================================
    // Shared helpers
    // ============================================================================

    async fn credentials(&self) -> Result<Credentials> {
        let credentials = self
            .secrets
            .load_credentials(&self.config.backend.provider)
            .await?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Applies `edit` to a copy of the current session and commits it only
    /// when the edit succeeds. With `recompose` set, the stored report is
    /// recomposed locally if auto-update is on and no generation is pending.
    async fn edit<T>(
        &self,
        action: &'static str,
        recompose: bool,
        edit: impl FnOnce(&mut ResearchSession) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.write().await;
        let session = state.session_mut(action)?;

        let mut draft = session.clone();
        let value = edit(&mut draft)?;
        if recompose {
            self.auto_update(&mut draft);
        }
        draft.touch();

        *session = draft;
        self.persistence.save(session);
        tracing::debug!(research_id = %session.id, action, "Session updated");
        Ok(value)
    }

    fn auto_update(&self, session: &mut ResearchSession) {
        if !session.auto_update_report {
            return;
        }
        if self.report_in_flight.load(Ordering::SeqCst) {
            tracing::debug!(research_id = %session.id, "Report generation in flight; auto-update skipped");
            return;
        }
        session.generated_report = compose(session, &session.report_settings);
    }

    /// Applies a collaborator response when `ticket` still identifies the
    /// current session.
    async fn apply_response<T>(
        &self,
        ticket: &RequestTicket,
        action: &'static str,
        apply: impl FnOnce(&mut ResearchSession) -> Result<T>,
    ) -> Result<Outcome<T>> {
        let mut state = self.state.write().await;
        if !state.is_current(ticket) {
            tracing::debug!(action, "Dropping response for a superseded session");
            return Ok(Outcome::Discarded);
        }
        self.commit_response(&mut state, action, apply).map(Outcome::Applied)
    }

    fn commit_response<T>(
        &self,
        state: &mut WorkflowState,
        action: &'static str,
        apply: impl FnOnce(&mut ResearchSession) -> Result<T>,
    ) -> Result<T> {
        let session = state.session_mut(action)?;
        let mut draft = session.clone();
        let value = apply(&mut draft)?;
        draft.touch();
        *session = draft;
        self.persistence.save(session);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> ResearchSession {
        ResearchSession::new(
            ResearchId::parse(id).unwrap(),
            "Topic",
            vec!["g".to_string()],
            vec!["t".to_string()],
            Default::default(),
            false,
        )
    }

    #[test]
    fn test_ticket_matches_until_session_is_replaced() {
        let mut state = WorkflowState::default();
        state.replace_session(Some(session("research-1")));
        let ticket = state.ticket();
        assert!(state.is_current(&ticket));

        state.replace_session(Some(session("research-1")));
        assert!(!state.is_current(&ticket));
    }

    #[test]
    fn test_ticket_without_session_goes_stale_on_commit() {
        let mut state = WorkflowState::default();
        let ticket = state.ticket();
        assert!(state.is_current(&ticket));

        state.replace_session(Some(session("research-2")));
        assert!(!state.is_current(&ticket));
    }

    #[test]
    fn test_in_flight_flag_is_released_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = InFlight::acquire(&flag, "topic").unwrap();
            assert!(InFlight::acquire(&flag, "topic").unwrap_err().is_in_flight());
        }
        assert!(InFlight::acquire(&flag, "topic").is_ok());
    }

    #[test]
    fn test_outcome_accessors() {
        assert_eq!(Outcome::Applied(3).applied(), Some(3));
        assert!(Outcome::<()>::Discarded.is_discarded());
    }
}
