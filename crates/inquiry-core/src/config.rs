//! Application configuration and credentials.

use crate::error::{InquiryError, Result};
use crate::report::{Language, ReportStyle};
use serde::{Deserialize, Serialize};

/// Root configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub report: ReportDefaults,
}

/// Connection settings for the research backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Language model provider forwarded to the backend (e.g. "chatgpt").
    #[serde(default = "default_provider")]
    pub provider: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            provider: default_provider(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_provider() -> String {
    "chatgpt".to_string()
}

/// Defaults applied to the report settings of a newly created session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDefaults {
    #[serde(default)]
    pub default_language: Language,
    #[serde(default)]
    pub default_style: ReportStyle,
    #[serde(default)]
    pub auto_update: bool,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            default_style: ReportStyle::default(),
            auto_update: false,
        }
    }
}

/// Secrets stored in `secret.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Credentials forwarded to language-model backed collaborators.
///
/// `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub provider: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(provider: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: api_key.into(),
        }
    }

    /// Rejects a blank key before any collaborator call is made.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(InquiryError::validation(
                "API key is missing; add it to secret.json or INQUIRY_API_KEY",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
