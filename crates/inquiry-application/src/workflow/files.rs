//! Uploaded research documents.
//!
//! Uploads may run concurrently with each other and with chat or report
//! calls. Each status change is applied under the state lock, so readers
//! never observe a half-updated entry.

use super::{Outcome, WorkflowController};
use inquiry_core::collaborator::Annotation;
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::session::{FileStatus, UploadedFile};

impl WorkflowController {
    /// Uploads a document for the current session.
    ///
    /// A failed upload is still listed, with status `error` and a local id,
    /// and the error is returned. The view never changes.
    pub async fn upload_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<Outcome<String>> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(InquiryError::validation("file name must not be empty"));
        }
        let (research_id, ticket) = {
            let state = self.state.read().await;
            let session = state.session("upload_file")?;
            (session.id.clone(), state.ticket())
        };

        tracing::info!(research_id = %research_id, file_name, "Uploading file");
        let result = self
            .collaborators
            .file_service
            .upload_file(file_name, bytes, &research_id)
            .await
            .and_then(|stored| stored.validate());

        match result {
            Ok(stored) => {
                self.apply_response(&ticket, "upload_file", |session| {
                    if session.file(&stored.file_id).is_some() {
                        return Err(InquiryError::validation(format!(
                            "file '{}' is already listed",
                            stored.file_id
                        )));
                    }
                    session
                        .uploaded_files
                        .push(UploadedFile::uploaded(stored.file_id.clone(), stored.display_name));
                    Ok(stored.file_id)
                })
                .await
            }
            Err(e) => {
                tracing::warn!(research_id = %research_id, file_name, error = %e, "Upload failed");
                let message = e.to_string();
                let recorded = self
                    .apply_response(&ticket, "upload_file", |session| {
                        let local_id = session.next_item_id("upload");
                        session
                            .uploaded_files
                            .push(UploadedFile::failed(local_id, file_name, message));
                        Ok(())
                    })
                    .await?;
                match recorded {
                    Outcome::Applied(()) => Err(e.into()),
                    Outcome::Discarded => Ok(Outcome::Discarded),
                }
            }
        }
    }

    /// Vectorizes an uploaded file. Also serves as the retry for a file whose
    /// vectorization failed.
    ///
    /// On failure the file moves to `error` with the message recorded; a
    /// vectorized file is never moved back.
    pub async fn vectorize_file(&self, file_id: &str) -> Result<Outcome<()>> {
        let (research_id, ticket) = {
            let state = self.state.read().await;
            let session = state.session("vectorize_file")?;
            let file = session
                .file(file_id)
                .ok_or_else(|| InquiryError::not_found("UploadedFile", file_id))?;
            if !file.stored {
                return Err(InquiryError::validation(format!(
                    "file '{}' was never uploaded; upload it again",
                    file.display_name
                )));
            }
            if !file.status.can_transition_to(FileStatus::Vectorized) {
                return Err(InquiryError::validation(format!(
                    "file '{}' is already {}",
                    file.display_name, file.status
                )));
            }
            (session.id.clone(), state.ticket())
        };

        let result = self
            .collaborators
            .file_service
            .vectorize_file(file_id, &research_id)
            .await;

        match result {
            Ok(()) => {
                tracing::info!(research_id = %research_id, file_id, "File vectorized");
                self.apply_response(&ticket, "vectorize_file", |session| {
                    session.set_file_status(file_id, FileStatus::Vectorized)
                })
                .await
            }
            Err(e) => {
                tracing::warn!(research_id = %research_id, file_id, error = %e, "Vectorization failed");
                let message = e.to_string();
                let recorded = self
                    .apply_response(&ticket, "vectorize_file", |session| {
                        session.file_mut(file_id)?.mark_failed(message)
                    })
                    .await?;
                match recorded {
                    Outcome::Applied(()) => Err(e.into()),
                    Outcome::Discarded => Ok(Outcome::Discarded),
                }
            }
        }
    }

    /// Deletes a document and drops it from the file list.
    ///
    /// An entry whose upload never reached the backend is dropped locally.
    /// When the backend refuses the deletion the entry stays listed.
    pub async fn remove_file(&self, file_id: &str) -> Result<Outcome<()>> {
        let (research_id, stored, ticket) = {
            let state = self.state.read().await;
            let session = state.session("remove_file")?;
            let file = session
                .file(file_id)
                .ok_or_else(|| InquiryError::not_found("UploadedFile", file_id))?;
            (session.id.clone(), file.stored, state.ticket())
        };

        if stored {
            self.collaborators
                .file_service
                .delete_file(file_id, &research_id)
                .await
                .map_err(|e| {
                    tracing::warn!(research_id = %research_id, file_id, error = %e, "File deletion failed");
                    e
                })?;
        }

        let outcome = self
            .apply_response(&ticket, "remove_file", |session| session.remove_file(file_id))
            .await?;
        tracing::info!(research_id = %research_id, file_id, "File removed");
        Ok(outcome)
    }

    /// Fetches and stores an annotation for an uploaded file.
    pub async fn generate_annotation(&self, file_id: &str) -> Result<Outcome<String>> {
        let (research_id, ticket) = {
            let state = self.state.read().await;
            let session = state.session("generate_annotation")?;
            let file = session
                .file(file_id)
                .ok_or_else(|| InquiryError::not_found("UploadedFile", file_id))?;
            if !file.stored {
                return Err(InquiryError::validation(format!(
                    "file '{}' was never uploaded",
                    file.display_name
                )));
            }
            (session.id.clone(), state.ticket())
        };

        let annotation = self
            .collaborators
            .file_service
            .generate_annotation(file_id, &research_id)
            .await
            .and_then(Annotation::validate)
            .map_err(|e| {
                tracing::warn!(research_id = %research_id, file_id, error = %e, "Annotation failed");
                e
            })?;

        self.apply_response(&ticket, "generate_annotation", |session| {
            session.file_mut(file_id)?.annotation = Some(annotation.annotation.clone());
            Ok(annotation.annotation)
        })
        .await
    }
}
