//! Error types for the Inquiry application.

use crate::collaborator::CollaboratorError;
use thiserror::Error;

/// A shared error type for the entire Inquiry application.
///
/// Variants follow the error taxonomy of the workflow:
/// - `Validation` is raised before any collaborator call and never changes state.
/// - `Collaborator` wraps a failed or malformed collaborator response.
/// - `Persistence` is reported but never fatal for the in-memory session.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InquiryError {
    /// Rejected user input (empty topic, missing credential, unknown id).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator call failed or returned a malformed response.
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// A snapshot could not be written or removed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The requested action is not enabled in the current view.
    #[error("Action '{action}' is not allowed in view {view}")]
    InvalidTransition { view: String, action: &'static str },

    /// Another transition of the same kind is already pending.
    #[error("Transition already in flight: {0}")]
    TransitionInFlight(&'static str),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InquiryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn invalid_transition(view: impl std::fmt::Display, action: &'static str) -> Self {
        Self::InvalidTransition {
            view: view.to_string(),
            action,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_collaborator(&self) -> bool {
        matches!(self, Self::Collaborator(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::TransitionInFlight(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for InquiryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for InquiryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for InquiryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for InquiryError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, InquiryError>`.
pub type Result<T> = std::result::Result<T, InquiryError>;
