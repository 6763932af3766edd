//! Request bodies sent to the research backend.

use inquiry_core::collaborator::ProposedRecommendation;
use inquiry_core::session::ChatMessage;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct TopicRequest<'a> {
    pub research_topic: &'a str,
    pub provider: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub prompt: &'a str,
    pub provider: &'a str,
    pub research_id: &'a str,
    pub context: ChatRequestContext<'a>,
}

#[derive(Serialize)]
pub(crate) struct ChatRequestContext<'a> {
    pub topic: &'a str,
    pub goals: &'a [String],
    pub tasks: &'a [String],
    pub history: &'a [ChatMessage],
}

#[derive(Serialize)]
pub(crate) struct FileRequest<'a> {
    pub research_id: &'a str,
    pub provider: &'a str,
}

/// Recommendations arrive wrapped in an object.
#[derive(Deserialize)]
pub(crate) struct RecommendationsResponse {
    pub recommendations: Vec<ProposedRecommendation>,
}

/// FastAPI style error body.
#[derive(Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: String,
}
