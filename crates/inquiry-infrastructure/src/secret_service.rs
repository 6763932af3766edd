//! Secret service implementation.
//!
//! Reads the API key from `secret.json`, falling back to the
//! `INQUIRY_API_KEY` environment variable.

use crate::paths::InquiryPaths;
use crate::storage::AtomicFile;
use async_trait::async_trait;
use inquiry_core::config::{Credentials, SecretConfig};
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::secret::SecretService;
use std::path::PathBuf;
use std::sync::Arc;

pub const API_KEY_ENV: &str = "INQUIRY_API_KEY";

#[derive(Clone)]
pub struct FileSecretService {
    file: Arc<AtomicFile<SecretConfig>>,
    /// Key taken from the environment when the service was created.
    env_key: Option<String>,
}

impl FileSecretService {
    pub fn new(paths: &InquiryPaths) -> Self {
        Self::with_env_key(paths.secret_file(), std::env::var(API_KEY_ENV).ok())
    }

    pub fn with_env_key(secret_file: PathBuf, env_key: Option<String>) -> Self {
        Self {
            file: Arc::new(AtomicFile::json(secret_file)),
            env_key,
        }
    }
}

#[async_trait]
impl SecretService for FileSecretService {
    async fn load_credentials(&self, provider: &str) -> Result<Credentials> {
        let file = self.file.clone();
        let secrets = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| InquiryError::internal(format!("Failed to join blocking task: {}", e)))??
            .unwrap_or_default();

        let api_key = secrets
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.env_key.clone())
            .unwrap_or_default();

        Ok(Credentials::new(provider, api_key.trim()))
    }
}
