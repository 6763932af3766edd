//! Unified path management for inquiry configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/inquiry/           # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API key
//!
//! ~/.local/share/inquiry/      # Data directory
//! ├── sessions/                # One snapshot per research id
//! ├── active_session.json      # Id of the current session
//! ├── recent_topics.json       # Recently submitted topics
//! └── logs/                    # Application logs
//!     └── inquiry.log.YYYY-MM-DD
//! ```
//!
//! With an explicit base directory both trees live under that directory.

use inquiry_core::config::SecretConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "inquiry";

/// Errors that can occur during path resolution.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Cannot find the platform {0} directory")]
    DirNotFound(&'static str),
}

impl From<PathError> for inquiry_core::InquiryError {
    fn from(err: PathError) -> Self {
        inquiry_core::InquiryError::config(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl InquiryPaths {
    /// Resolves the directories, rooted at `base_dir` when given.
    pub fn new(base_dir: Option<&Path>) -> Result<Self, PathError> {
        match base_dir {
            Some(base) => Ok(Self {
                config_dir: base.to_path_buf(),
                data_dir: base.to_path_buf(),
            }),
            None => Self::platform_default(),
        }
    }

    /// Platform directories (XDG on Linux, Application Support on macOS).
    pub fn platform_default() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::DirNotFound("config"))?
            .join(APP_DIR_NAME);
        let data_dir = dirs::data_dir()
            .ok_or(PathError::DirNotFound("data"))?
            .join(APP_DIR_NAME);
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file(&self) -> PathBuf {
        self.config_dir.join("secret.json")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    pub fn active_session_file(&self) -> PathBuf {
        self.data_dir.join("active_session.json")
    }

    pub fn recent_topics_file(&self) -> PathBuf {
        self.data_dir.join("recent_topics.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Ensures the secret file exists, creating an empty template if not.
    ///
    /// On Unix the file is created with mode 600.
    pub fn ensure_secret_file(&self) -> std::io::Result<PathBuf> {
        let secret_path = self.secret_file();
        if secret_path.exists() {
            return Ok(secret_path);
        }

        if let Some(parent) = secret_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            api_key: Some(String::new()),
        };
        let template_json = serde_json::to_string_pretty(&template).map_err(std::io::Error::other)?;
        std::fs::write(&secret_path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&secret_path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(secret_path)
    }
}
