//! Configuration service implementation.
//!
//! Loads the application configuration from `config.toml`, writing the
//! defaults on first run.

use crate::paths::InquiryPaths;
use crate::storage::AtomicFile;
use inquiry_core::config::AppConfig;
use inquiry_core::error::Result;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the application configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicFile<AppConfig>>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<AppConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &InquiryPaths) -> Self {
        Self {
            file: Arc::new(AtomicFile::toml(paths.config_file())),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading it from file if not cached.
    ///
    /// A missing file is created with default values. A malformed file is an
    /// error rather than a silent fallback, so the user notices typos.
    pub fn get_config(&self) -> Result<AppConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = match self.file.load()? {
            Some(config) => config,
            None => {
                let defaults = AppConfig::default();
                self.file.save(&defaults)?;
                tracing::info!(path = %self.file.path().display(), "Created default configuration");
                defaults
            }
        };

        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = Some(loaded.clone());
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inquiry_core::report::Language;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InquiryPaths::new(Some(temp_dir.path())).unwrap();
        let service = ConfigService::new(&paths);

        assert_eq!(service.get_config().unwrap(), AppConfig::default());
        assert!(paths.config_file().exists());
    }

    #[test]
    fn test_config_is_cached_per_service() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InquiryPaths::new(Some(temp_dir.path())).unwrap();
        let service = ConfigService::new(&paths);
        service.get_config().unwrap();

        std::fs::write(paths.config_file(), "[report]\ndefault_language = \"en\"\n").unwrap();
        assert_eq!(service.get_config().unwrap().report.default_language, Language::Ru);

        let fresh = ConfigService::new(&paths);
        assert_eq!(fresh.get_config().unwrap().report.default_language, Language::En);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = InquiryPaths::new(Some(temp_dir.path())).unwrap();
        std::fs::write(paths.config_file(), "[backend\n").unwrap();
        assert!(ConfigService::new(&paths).get_config().is_err());
    }
}
