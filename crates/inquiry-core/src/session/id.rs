//! Research session identifiers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// Last timestamp handed out by [`ResearchId::mint`] in this process.
static LAST_MINTED_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Identifier of one research session.
///
/// Minted ids are time-derived (`research-<unix millis>`) and strictly
/// increasing within the process, so two commits in the same millisecond
/// still receive distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResearchId(String);

impl ResearchId {
    pub fn mint() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let mut last = LAST_MINTED_MILLIS.load(Ordering::SeqCst);
        loop {
            let next = now.max(last + 1);
            match LAST_MINTED_MILLIS.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Self(format!("research-{next}")),
                Err(actual) => last = actual,
            }
        }
    }

    /// Wraps an existing id, e.g. one read back from storage.
    ///
    /// Returns `None` for ids that are empty or unsafe as a file name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ResearchId {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("invalid research id '{raw}'"))
    }
}

impl From<ResearchId> for String {
    fn from(id: ResearchId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ResearchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
