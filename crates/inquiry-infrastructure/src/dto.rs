//! On-disk representations.
//!
//! Session snapshots are wrapped in a versioned envelope so the storage
//! format can evolve without touching the domain model.

use inquiry_core::error::{InquiryError, Result};
use inquiry_core::session::{ResearchId, ResearchSession};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Version written into every new snapshot.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub session: ResearchSession,
}

impl SessionSnapshot {
    pub fn new(session: ResearchSession) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            session,
        }
    }

    /// Unwraps the session after checking that its major version is readable.
    pub fn into_session(self) -> Result<ResearchSession> {
        let found = Version::parse(&self.version).map_err(|e| InquiryError::Serialization {
            format: "snapshot".to_string(),
            message: format!("invalid version '{}': {}", self.version, e),
        })?;
        let supported = Version::new(1, 0, 0);
        if found.major != supported.major {
            return Err(InquiryError::Serialization {
                format: "snapshot".to_string(),
                message: format!("unsupported snapshot version {found}"),
            });
        }
        Ok(self.session)
    }
}

/// Contents of the active-session pointer file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSessionPointer {
    pub research_id: ResearchId,
}
