pub mod compose;
pub mod filter;
pub mod recent;
pub mod reset;
pub mod start;
pub mod status;

use anyhow::{Context, Result};
use inquiry_application::{Collaborators, WorkflowController};
use inquiry_core::secret::SecretService;
use inquiry_core::session::{ResearchSession, SessionStore};
use inquiry_infrastructure::{
    ConfigService, FileRecentTopicsRepository, FileSecretService, FileSessionStore, InquiryPaths,
};
use inquiry_interaction::HttpResearchBackend;
use std::sync::Arc;

/// Reads the current session straight from storage.
pub async fn current_session(paths: &InquiryPaths) -> Result<Option<ResearchSession>> {
    let store = FileSessionStore::new(paths).await?;
    let Some(id) = store.active_session_id().await? else {
        return Ok(None);
    };
    Ok(store.load(&id).await?)
}

/// Builds a controller wired to the file stores and the HTTP backend, with
/// the last active session rehydrated.
pub async fn open_controller(paths: &InquiryPaths) -> Result<WorkflowController> {
    let config = ConfigService::new(paths)
        .get_config()
        .context("Failed to load config.toml")?;
    paths
        .ensure_secret_file()
        .context("Failed to create secret.json")?;

    let secrets = Arc::new(FileSecretService::new(paths));
    let api_key = secrets
        .load_credentials(&config.backend.provider)
        .await?
        .api_key;
    let backend = Arc::new(HttpResearchBackend::new(&config.backend)?.with_api_key(api_key));
    let store = Arc::new(FileSessionStore::new(paths).await?);
    let recent = Arc::new(FileRecentTopicsRepository::new(paths));

    let controller = WorkflowController::new(
        store,
        recent,
        secrets,
        Collaborators::from_backend(backend),
        config,
    );
    controller.bootstrap().await;
    Ok(controller)
}

/// Waits for pending writes and reports a failed one.
pub async fn finish(controller: &WorkflowController) {
    controller.flush().await;
    if let Some(error) = controller.last_persistence_error() {
        eprintln!("warning: changes were not saved: {error}");
    }
}
