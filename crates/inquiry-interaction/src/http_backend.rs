//! HttpResearchBackend - JSON over HTTP implementation of every collaborator.
//!
//! Each response body is decoded into its typed schema and validated; any
//! deviation is reported as `CollaboratorError::InvalidFormat` and nothing is
//! applied to the session.

use crate::wire::{
    ChatRequest, ChatRequestContext, ErrorDetail, FileRequest, RecommendationsResponse,
    TopicRequest,
};
use async_trait::async_trait;
use inquiry_core::collaborator::{
    Annotation, ChatAssistant, ChatContext, ChatReply, CollaboratorError, CollaboratorResult,
    FileService, GeneratedReport, PlanGenerator, ProposedRecommendation, RecommendationRequest,
    RefinedTopic, ReportGenerator, ResearchPlan, StoredFile, TopicRefiner,
};
use inquiry_core::config::{BackendConfig, Credentials};
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::report::ReportRequest;
use inquiry_core::session::ResearchId;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the research backend service.
#[derive(Clone)]
pub struct HttpResearchBackend {
    client: Client,
    base_url: String,
    provider: String,
    /// Key used for calls whose contract carries no credentials (files, reports).
    api_key: Option<String>,
}

impl HttpResearchBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| InquiryError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            provider: config.provider.clone(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
        match api_key.or(self.api_key.as_deref()) {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> CollaboratorResult<T> {
        let body = self.send_raw(request, what).await?;
        decode(&body)
    }

    async fn send_raw(&self, request: RequestBuilder, what: &str) -> CollaboratorResult<String> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(call = what, error = %e, "Backend request failed");
            CollaboratorError::Transport(format!("{what}: {e}"))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CollaboratorError::Transport(format!("{what}: failed to read body: {e}")))?;

        if !status.is_success() {
            tracing::warn!(call = what, status = status.as_u16(), "Backend returned an error");
            return Err(map_http_error(status, &body));
        }
        Ok(body)
    }
}

pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> CollaboratorError {
    if status == StatusCode::UNAUTHORIZED {
        return CollaboratorError::Unauthorized;
    }
    let message = serde_json::from_str::<ErrorDetail>(body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.trim().to_string());
    CollaboratorError::Server {
        status: status.as_u16(),
        message,
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> CollaboratorResult<T> {
    serde_json::from_str(body).map_err(|e| CollaboratorError::invalid_format(e.to_string()))
}

#[async_trait]
impl TopicRefiner for HttpResearchBackend {
    async fn refine_topic(
        &self,
        topic: &str,
        credentials: &Credentials,
    ) -> CollaboratorResult<RefinedTopic> {
        let body = TopicRequest {
            research_topic: topic,
            provider: &credentials.provider,
        };
        let request = self.client.post(self.url("/api/refine-topic")).json(&body);
        let request = self.authorize(request, Some(&credentials.api_key));
        self.send::<RefinedTopic>(request, "refine-topic").await?.validate()
    }
}

#[async_trait]
impl PlanGenerator for HttpResearchBackend {
    async fn generate_plan(
        &self,
        topic: &str,
        credentials: &Credentials,
    ) -> CollaboratorResult<ResearchPlan> {
        let body = TopicRequest {
            research_topic: topic,
            provider: &credentials.provider,
        };
        let request = self.client.post(self.url("/api/research/goals")).json(&body);
        let request = self.authorize(request, Some(&credentials.api_key));
        self.send::<ResearchPlan>(request, "generate-plan").await?.validate()
    }
}

#[async_trait]
impl ChatAssistant for HttpResearchBackend {
    async fn chat(
        &self,
        prompt: &str,
        context: &ChatContext,
        credentials: &Credentials,
    ) -> CollaboratorResult<ChatReply> {
        let body = ChatRequest {
            prompt,
            provider: &credentials.provider,
            research_id: context.research_id.as_str(),
            context: ChatRequestContext {
                topic: &context.topic,
                goals: &context.goals,
                tasks: &context.tasks,
                history: &context.history,
            },
        };
        let request = self.client.post(self.url("/api/chat")).json(&body);
        let request = self.authorize(request, Some(&credentials.api_key));
        self.send::<ChatReply>(request, "chat").await?.validate()
    }
}

#[async_trait]
impl FileService for HttpResearchBackend {
    async fn upload_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        research_id: &ResearchId,
    ) -> CollaboratorResult<StoredFile> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| CollaboratorError::Transport(format!("upload: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .text("research_id", research_id.as_str().to_string())
            .part("files", part);

        let request = self.client.post(self.url("/api/files/upload")).multipart(form);
        let request = self.authorize(request, None);
        self.send::<StoredFile>(request, "upload").await?.validate()
    }

    async fn vectorize_file(&self, file_id: &str, research_id: &ResearchId) -> CollaboratorResult<()> {
        let body = FileRequest {
            research_id: research_id.as_str(),
            provider: &self.provider,
        };
        let request = self
            .client
            .post(self.url(&format!("/api/files/{file_id}/vectorize")))
            .json(&body);
        let request = self.authorize(request, None);
        self.send_raw(request, "vectorize").await?;
        Ok(())
    }

    async fn generate_annotation(
        &self,
        file_id: &str,
        research_id: &ResearchId,
    ) -> CollaboratorResult<Annotation> {
        let body = FileRequest {
            research_id: research_id.as_str(),
            provider: &self.provider,
        };
        let request = self
            .client
            .post(self.url(&format!("/api/annotation/{file_id}")))
            .json(&body);
        let request = self.authorize(request, None);
        self.send::<Annotation>(request, "annotation").await?.validate()
    }

    async fn delete_file(&self, file_id: &str, research_id: &ResearchId) -> CollaboratorResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/files/{file_id}")))
            .query(&[("research_id", research_id.as_str())]);
        let request = self.authorize(request, None);
        self.send_raw(request, "delete").await?;
        Ok(())
    }
}

#[async_trait]
impl ReportGenerator for HttpResearchBackend {
    async fn generate_report(&self, request: &ReportRequest) -> CollaboratorResult<GeneratedReport> {
        let http = self
            .client
            .post(self.url("/api/research/generate-report"))
            .json(request);
        let http = self.authorize(http, None);
        self.send::<GeneratedReport>(http, "generate-report").await?.validate()
    }

    async fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> CollaboratorResult<Vec<ProposedRecommendation>> {
        let http = self
            .client
            .post(self.url("/api/research/generate-recommendations"))
            .json(request);
        let http = self.authorize(http, None);
        let response: RecommendationsResponse = self.send(http, "generate-recommendations").await?;
        Ok(response.recommendations)
    }
}
