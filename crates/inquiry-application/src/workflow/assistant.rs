//! Research assistant chat.

use super::{Outcome, WorkflowController};
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::session::ChatRole;

impl WorkflowController {
    /// Sends a prompt to the research assistant.
    ///
    /// The user message is committed before the call and stays in the
    /// transcript when the assistant fails; the reply is appended only when
    /// it arrives for the same session.
    pub async fn send_chat_message(&self, prompt: &str) -> Result<Outcome<String>> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(InquiryError::validation("message must not be empty"));
        }
        self.state.read().await.session("send_chat_message")?;
        let credentials = self.credentials().await?;

        let (context, ticket) = {
            let mut state = self.state.write().await;
            let ticket = state.ticket();
            let session = state.session_mut("send_chat_message")?;
            // History sent along is the transcript before this prompt.
            let context = session.chat_context();
            session.push_chat_message(ChatRole::User, prompt);
            session.touch();
            self.persistence.save(session);
            (context, ticket)
        };

        let reply = self
            .collaborators
            .chat_assistant
            .chat(prompt, &context, &credentials)
            .await
            .and_then(|r| r.validate())
            .map_err(|e| {
                tracing::warn!(research_id = %context.research_id, error = %e, "Assistant request failed");
                e
            })?;

        self.apply_response(&ticket, "send_chat_message", |session| {
            session.push_chat_message(ChatRole::Assistant, reply.response.clone());
            Ok(reply.response)
        })
        .await
    }
}
