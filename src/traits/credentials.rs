//! Credentials provider trait abstraction.
//!
//! Provides a trait-based abstraction for session credential storage,
//! enabling dependency injection and mocking in tests.

use async_trait::async_trait;

use crate::auth::SessionCredential;

/// Credentials operation errors.
#[derive(Debug, Clone)]
pub enum CredentialsError {
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Failed to clear credentials
    ClearFailed(String),
    /// IO error
    Io(String),
    /// Serialization/deserialization error (e.g. corrupt JSON on disk)
    Serialization(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::ClearFailed(msg) => {
                write!(f, "Failed to clear credentials: {}", msg)
            }
            CredentialsError::Io(msg) => write!(f, "IO error: {}", msg),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Trait for session credential storage and retrieval.
///
/// At most one credential is stored at a time; `save` overwrites it.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load the stored credential.
    ///
    /// # Returns
    /// - `Ok(Some(credential))` if a credential is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if the store exists but could not be read or parsed
    async fn load(&self) -> Result<Option<SessionCredential>, CredentialsError>;

    /// Save a credential, replacing any previous one.
    async fn save(&self, credential: &SessionCredential) -> Result<(), CredentialsError>;

    /// Remove the stored credential. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), CredentialsError>;

    /// Check whether a usable credential is stored.
    ///
    /// Load failures count as "no credential".
    async fn has(&self) -> bool {
        matches!(self.load().await, Ok(Some(ref c)) if !c.cookie.is_empty())
    }
}
