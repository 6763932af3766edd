//! File-based SessionStore implementation.
//!
//! Directory structure:
//! ```text
//! data_dir/
//! ├── sessions/
//! │   ├── research-1718000000000.json
//! │   └── research-1718000123456.json
//! └── active_session.json
//! ```
//!
//! All file I/O runs in `spawn_blocking`; snapshots and the pointer are
//! written through [`AtomicFile`] so a crash mid-write leaves the previous
//! version intact.

use crate::dto::{ActiveSessionPointer, SessionSnapshot};
use crate::paths::InquiryPaths;
use crate::storage::{AtomicFile, AtomicFileError};
use async_trait::async_trait;
use inquiry_core::error::{InquiryError, Result};
use inquiry_core::session::{ResearchId, ResearchSession, SessionStore};
use std::path::{Path, PathBuf};
use tokio::task;

pub struct FileSessionStore {
    sessions_dir: PathBuf,
    active_file: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at the data directory of `paths`.
    pub async fn new(paths: &InquiryPaths) -> Result<Self> {
        let sessions_dir = paths.sessions_dir();
        let dir = sessions_dir.clone();
        run_blocking(move || std::fs::create_dir_all(&dir).map_err(InquiryError::from)).await?;
        Ok(Self {
            sessions_dir,
            active_file: paths.active_session_file(),
        })
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn snapshot_file(&self, id: &ResearchId) -> AtomicFile<SessionSnapshot> {
        AtomicFile::json(self.sessions_dir.join(format!("{}.json", id.as_str())))
    }

    fn pointer_file(&self) -> AtomicFile<ActiveSessionPointer> {
        AtomicFile::json(self.active_file.clone())
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| InquiryError::internal(format!("Failed to join blocking task: {}", e)))?
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &ResearchId) -> Result<Option<ResearchSession>> {
        let file = self.snapshot_file(id);
        let snapshot = run_blocking(move || file.load().map_err(InquiryError::from)).await?;
        snapshot.map(SessionSnapshot::into_session).transpose()
    }

    async fn save(&self, session: &ResearchSession) -> Result<()> {
        let file = self.snapshot_file(&session.id);
        let snapshot = SessionSnapshot::new(session.clone());
        run_blocking(move || file.save(&snapshot).map_err(InquiryError::from)).await?;
        tracing::debug!(research_id = %session.id, "Saved session snapshot");
        Ok(())
    }

    async fn remove(&self, id: &ResearchId) -> Result<()> {
        let file = self.snapshot_file(id);
        run_blocking(move || file.remove().map_err(InquiryError::from)).await?;
        tracing::debug!(research_id = %id, "Removed session snapshot");
        Ok(())
    }

    async fn active_session_id(&self) -> Result<Option<ResearchId>> {
        let file = self.pointer_file();
        run_blocking(move || match file.load() {
            Ok(pointer) => Ok(pointer.map(|p| p.research_id)),
            Err(AtomicFileError::Json(e)) => {
                tracing::warn!(error = %e, "Ignoring malformed active session pointer");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        })
        .await
    }

    async fn set_active_session_id(&self, id: &ResearchId) -> Result<()> {
        let file = self.pointer_file();
        let pointer = ActiveSessionPointer {
            research_id: id.clone(),
        };
        run_blocking(move || file.save(&pointer).map_err(InquiryError::from)).await
    }

    async fn clear_active_session_id(&self) -> Result<()> {
        let file = self.pointer_file();
        run_blocking(move || file.remove().map_err(InquiryError::from)).await
    }
}
