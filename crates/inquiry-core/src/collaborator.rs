//! Collaborator contracts consumed by the workflow.
//!
//! Everything that talks to a language model or a document service sits
//! behind one of these traits. The core only depends on the typed request and
//! response shapes declared here; a response that does not satisfy its
//! `validate` check is treated exactly like a transport failure.

use crate::config::Credentials;
use crate::report::ReportRequest;
use crate::session::{Approach, ChatMessage, KeyTerm, Priority, ResearchId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a collaborator call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollaboratorError {
    /// The provider rejected the credentials.
    #[error("unauthorized: check the API key in settings")]
    Unauthorized,

    /// The collaborator answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response did not match the expected schema.
    #[error("invalid response format: {0}")]
    InvalidFormat(String),

    /// The request never reached the collaborator or the connection broke.
    #[error("transport error: {0}")]
    Transport(String),
}

impl CollaboratorError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }
}

pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

// ============================================================================
// Response schemas
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedTopic {
    pub refined_topic: String,
}

impl RefinedTopic {
    pub fn validate(self) -> CollaboratorResult<Self> {
        if self.refined_topic.trim().is_empty() {
            return Err(CollaboratorError::invalid_format("refined topic is empty"));
        }
        Ok(self)
    }
}

/// Goals and tasks derived from a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub goals: Vec<String>,
    pub tasks: Vec<String>,
}

impl ResearchPlan {
    /// A plan must carry at least one non-blank goal and one non-blank task.
    pub fn validate(self) -> CollaboratorResult<Self> {
        let goals: Vec<String> = self
            .goals
            .into_iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        let tasks: Vec<String> = self
            .tasks
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if goals.is_empty() {
            return Err(CollaboratorError::invalid_format("plan has no goals"));
        }
        if tasks.is_empty() {
            return Err(CollaboratorError::invalid_format("plan has no tasks"));
        }
        Ok(Self { goals, tasks })
    }
}

/// Context sent along with a chat prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub research_id: ResearchId,
    pub topic: String,
    pub goals: Vec<String>,
    pub tasks: Vec<String>,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

impl ChatReply {
    pub fn validate(self) -> CollaboratorResult<Self> {
        if self.response.trim().is_empty() {
            return Err(CollaboratorError::invalid_format("empty assistant response"));
        }
        Ok(self)
    }
}

/// Reference to a file accepted by the file service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_id: String,
    pub display_name: String,
}

impl StoredFile {
    pub fn validate(self) -> CollaboratorResult<Self> {
        if self.file_id.trim().is_empty() {
            return Err(CollaboratorError::invalid_format("missing file id"));
        }
        if self.display_name.trim().is_empty() {
            return Err(CollaboratorError::invalid_format("missing file name"));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub annotation: String,
}

impl Annotation {
    pub fn validate(self) -> CollaboratorResult<Self> {
        if self.annotation.trim().is_empty() {
            return Err(CollaboratorError::invalid_format("empty annotation"));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub report: String,
}

impl GeneratedReport {
    pub fn validate(self) -> CollaboratorResult<Self> {
        if self.report.trim().is_empty() {
            return Err(CollaboratorError::invalid_format("empty report"));
        }
        Ok(self)
    }
}

/// Payload for recommendation generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub research_id: ResearchId,
    pub topic: String,
    pub goals: Vec<String>,
    pub tasks: Vec<String>,
    pub notes: String,
    pub key_terms: Vec<KeyTerm>,
    pub approaches: Vec<Approach>,
}

/// A recommendation as proposed by the collaborator, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedRecommendation {
    #[serde(alias = "title")]
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Rejects a proposal list without a single usable recommendation, so a
/// malformed answer never wipes the current list.
pub fn validate_recommendations(
    proposed: Vec<ProposedRecommendation>,
) -> CollaboratorResult<Vec<ProposedRecommendation>> {
    if proposed.iter().all(|r| r.text.trim().is_empty()) {
        return Err(CollaboratorError::invalid_format("no recommendations"));
    }
    Ok(proposed)
}

// ============================================================================
// Collaborator traits
// ============================================================================

#[async_trait]
pub trait TopicRefiner: Send + Sync {
    async fn refine_topic(
        &self,
        topic: &str,
        credentials: &Credentials,
    ) -> CollaboratorResult<RefinedTopic>;
}

#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate_plan(
        &self,
        topic: &str,
        credentials: &Credentials,
    ) -> CollaboratorResult<ResearchPlan>;
}

#[async_trait]
pub trait ChatAssistant: Send + Sync {
    async fn chat(
        &self,
        prompt: &str,
        context: &ChatContext,
        credentials: &Credentials,
    ) -> CollaboratorResult<ChatReply>;
}

/// Upload, vectorization and annotation of research documents.
#[async_trait]
pub trait FileService: Send + Sync {
    async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        research_id: &ResearchId,
    ) -> CollaboratorResult<StoredFile>;

    async fn vectorize_file(
        &self,
        file_id: &str,
        research_id: &ResearchId,
    ) -> CollaboratorResult<()>;

    async fn generate_annotation(
        &self,
        file_id: &str,
        research_id: &ResearchId,
    ) -> CollaboratorResult<Annotation>;

    async fn delete_file(&self, file_id: &str, research_id: &ResearchId) -> CollaboratorResult<()>;
}

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate_report(&self, request: &ReportRequest) -> CollaboratorResult<GeneratedReport>;

    async fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> CollaboratorResult<Vec<ProposedRecommendation>>;
}
