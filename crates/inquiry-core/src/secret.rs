//! Secret management service trait.
//!
//! Defines the interface for loading the credentials used by language-model
//! backed collaborators.

use crate::config::Credentials;
use crate::error::Result;

/// Service for loading credentials.
///
/// Implementations must never log the key or include it in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the credentials for the given provider.
    ///
    /// Returns credentials with an empty key when none is configured; the
    /// workflow rejects those with a validation error at the call site.
    async fn load_credentials(&self, provider: &str) -> Result<Credentials>;
}
