//! References to documents uploaded for a research session.

use crate::error::{InquiryError, Result};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Processing status of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileStatus {
    Uploaded,
    Vectorized,
    Error,
}

impl FileStatus {
    /// Whether `self -> next` is a legal status change.
    ///
    /// Status only moves forward. `Error` can be left only by a successful
    /// retry, and `Vectorized` is final.
    pub fn can_transition_to(self, next: FileStatus) -> bool {
        matches!(
            (self, next),
            (FileStatus::Uploaded, FileStatus::Vectorized)
                | (FileStatus::Uploaded, FileStatus::Error)
                | (FileStatus::Error, FileStatus::Vectorized)
                | (FileStatus::Error, FileStatus::Error)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub display_name: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// False when the upload itself failed and the id is local only.
    #[serde(default = "default_stored")]
    pub stored: bool,
}

fn default_stored() -> bool {
    true
}

impl UploadedFile {
    /// A file accepted by the file service.
    pub fn uploaded(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            status: FileStatus::Uploaded,
            annotation: None,
            last_error: None,
            stored: true,
        }
    }

    /// A file whose upload failed; kept so the failure stays visible.
    pub fn failed(
        local_id: impl Into<String>,
        display_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: local_id.into(),
            display_name: display_name.into(),
            status: FileStatus::Error,
            annotation: None,
            last_error: Some(error.into()),
            stored: false,
        }
    }

    pub fn transition(&mut self, next: FileStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(InquiryError::validation(format!(
                "file '{}' cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        if next != FileStatus::Error {
            self.last_error = None;
        }
        Ok(())
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<()> {
        self.transition(FileStatus::Error)?;
        self.last_error = Some(error.into());
        Ok(())
    }
}
