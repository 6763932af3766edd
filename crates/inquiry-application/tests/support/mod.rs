//! Scripted collaborators and a controller harness shared by the workflow
//! tests.

#![allow(dead_code)]

use async_trait::async_trait;
use inquiry_application::{Collaborators, WorkflowController};
use inquiry_core::collaborator::{
    Annotation, ChatAssistant, ChatContext, ChatReply, CollaboratorError, CollaboratorResult,
    FileService, GeneratedReport, PlanGenerator, ProposedRecommendation, RecommendationRequest,
    RefinedTopic, ReportGenerator, ResearchPlan, StoredFile, TopicRefiner,
};
use inquiry_core::config::{AppConfig, Credentials};
use inquiry_core::error::Result;
use inquiry_core::report::ReportRequest;
use inquiry_core::secret::SecretService;
use inquiry_core::session::{ResearchId, SessionStore};
use inquiry_infrastructure::{MemoryRecentTopicsRepository, MemorySessionStore};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Pauses the next collaborator call until released.
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

type Script<T> = Mutex<VecDeque<CollaboratorResult<T>>>;

/// Backend answering every collaborator call from a per-call script.
///
/// An unscripted call fails with a server error.
#[derive(Default)]
pub struct ScriptedBackend {
    refined: Script<RefinedTopic>,
    plans: Script<ResearchPlan>,
    replies: Script<ChatReply>,
    uploads: Script<StoredFile>,
    vectorizations: Script<()>,
    annotations: Script<Annotation>,
    deletions: Script<()>,
    reports: Script<GeneratedReport>,
    recommendations: Script<Vec<ProposedRecommendation>>,
    gate: Mutex<Option<Gate>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn refine(&self, result: CollaboratorResult<&str>) {
        push(
            &self.refined,
            result.map(|t| RefinedTopic {
                refined_topic: t.to_string(),
            }),
        );
    }

    pub fn plan(&self, goals: &[&str], tasks: &[&str]) {
        push(
            &self.plans,
            Ok(ResearchPlan {
                goals: goals.iter().map(|g| g.to_string()).collect(),
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
            }),
        );
    }

    pub fn plan_fails(&self, error: CollaboratorError) {
        push(&self.plans, Err(error));
    }

    pub fn reply(&self, result: CollaboratorResult<&str>) {
        push(
            &self.replies,
            result.map(|r| ChatReply {
                response: r.to_string(),
            }),
        );
    }

    pub fn upload(&self, result: CollaboratorResult<(&str, &str)>) {
        push(
            &self.uploads,
            result.map(|(id, name)| StoredFile {
                file_id: id.to_string(),
                display_name: name.to_string(),
            }),
        );
    }

    pub fn vectorize(&self, result: CollaboratorResult<()>) {
        push(&self.vectorizations, result);
    }

    pub fn annotation(&self, text: &str) {
        push(
            &self.annotations,
            Ok(Annotation {
                annotation: text.to_string(),
            }),
        );
    }

    pub fn delete(&self, result: CollaboratorResult<()>) {
        push(&self.deletions, result);
    }

    pub fn report(&self, result: CollaboratorResult<&str>) {
        push(
            &self.reports,
            result.map(|r| GeneratedReport {
                report: r.to_string(),
            }),
        );
    }

    pub fn recommendations(&self, proposed: Vec<ProposedRecommendation>) {
        push(&self.recommendations, Ok(proposed));
    }

    /// Makes the next call wait on the returned gate.
    pub fn hold_next_call(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T>(&self, call: &str, script: &Script<T>) -> CollaboratorResult<T> {
        self.calls.lock().unwrap().push(call.to_string());
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(CollaboratorError::Server {
                    status: 500,
                    message: format!("unscripted {call}"),
                })
            })
    }
}

fn push<T>(script: &Script<T>, result: CollaboratorResult<T>) {
    script.lock().unwrap().push_back(result);
}

#[async_trait]
impl TopicRefiner for ScriptedBackend {
    async fn refine_topic(&self, _topic: &str, _c: &Credentials) -> CollaboratorResult<RefinedTopic> {
        self.answer("refine", &self.refined).await
    }
}

#[async_trait]
impl PlanGenerator for ScriptedBackend {
    async fn generate_plan(&self, _topic: &str, _c: &Credentials) -> CollaboratorResult<ResearchPlan> {
        self.answer("plan", &self.plans).await
    }
}

#[async_trait]
impl ChatAssistant for ScriptedBackend {
    async fn chat(
        &self,
        _prompt: &str,
        _context: &ChatContext,
        _c: &Credentials,
    ) -> CollaboratorResult<ChatReply> {
        self.answer("chat", &self.replies).await
    }
}

#[async_trait]
impl FileService for ScriptedBackend {
    async fn upload_file(
        &self,
        _file_name: &str,
        _bytes: Vec<u8>,
        _research_id: &ResearchId,
    ) -> CollaboratorResult<StoredFile> {
        self.answer("upload", &self.uploads).await
    }

    async fn vectorize_file(&self, _file_id: &str, _research_id: &ResearchId) -> CollaboratorResult<()> {
        self.answer("vectorize", &self.vectorizations).await
    }

    async fn generate_annotation(
        &self,
        _file_id: &str,
        _research_id: &ResearchId,
    ) -> CollaboratorResult<Annotation> {
        self.answer("annotation", &self.annotations).await
    }

    async fn delete_file(&self, _file_id: &str, _research_id: &ResearchId) -> CollaboratorResult<()> {
        self.answer("delete", &self.deletions).await
    }
}

#[async_trait]
impl ReportGenerator for ScriptedBackend {
    async fn generate_report(&self, _request: &ReportRequest) -> CollaboratorResult<GeneratedReport> {
        self.answer("report", &self.reports).await
    }

    async fn generate_recommendations(
        &self,
        _request: &RecommendationRequest,
    ) -> CollaboratorResult<Vec<ProposedRecommendation>> {
        self.answer("recommendations", &self.recommendations).await
    }
}

/// Secret service returning a fixed key.
pub struct StaticSecrets(pub &'static str);

#[async_trait]
impl SecretService for StaticSecrets {
    async fn load_credentials(&self, provider: &str) -> Result<Credentials> {
        Ok(Credentials::new(provider, self.0))
    }
}

pub struct Harness {
    pub controller: Arc<WorkflowController>,
    pub backend: Arc<ScriptedBackend>,
    pub store: Arc<MemorySessionStore>,
}

pub fn harness() -> Harness {
    harness_with_store(Arc::new(MemorySessionStore::new()))
}

pub fn harness_with_store(store: Arc<MemorySessionStore>) -> Harness {
    let backend = ScriptedBackend::new();
    let controller = controller_with(store.clone(), backend.clone(), "sk-test");
    Harness {
        controller,
        backend,
        store,
    }
}

pub fn controller_with(
    store: Arc<dyn SessionStore>,
    backend: Arc<ScriptedBackend>,
    api_key: &'static str,
) -> Arc<WorkflowController> {
    Arc::new(WorkflowController::new(
        store,
        Arc::new(MemoryRecentTopicsRepository::new()),
        Arc::new(StaticSecrets(api_key)),
        Collaborators::from_backend(backend),
        AppConfig::default(),
    ))
}

impl Harness {
    /// Drives the controller from `Search` into `Research(Notes)` for the
    /// given topic, keeping the original wording.
    pub async fn start_research(&self, topic: &str) -> ResearchId {
        self.backend.refine(Ok("Refined wording"));
        self.backend.plan(&["Goal"], &["Task"]);
        self.controller.submit_topic(topic).await.unwrap();
        self.controller
            .keep_original()
            .await
            .unwrap()
            .applied()
            .unwrap()
    }
}
