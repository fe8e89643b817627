//! File-based credentials provider adapter.
//!
//! Wraps [`CredentialsManager`] behind the async [`CredentialsProvider`]
//! trait. Writes are serialized with a mutex so a re-authentication never
//! interleaves with a logout.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::auth::credentials::{CredentialsManager, SessionCredential};
use crate::traits::{CredentialsError, CredentialsProvider};

/// File-based credentials provider.
///
/// Credentials are stored in `~/.luma-door/credentials.json` unless a path
/// is given.
#[derive(Debug)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
    write_lock: Mutex<()>,
}

impl FileCredentialsProvider {
    /// Create a provider at the default location.
    ///
    /// # Returns
    /// The provider, or an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(Self::from_manager)
            .ok_or_else(|| {
                CredentialsError::LoadFailed("Failed to determine home directory".to_string())
            })
    }

    /// Create a provider for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::from_manager(CredentialsManager::with_path(path))
    }

    fn from_manager(manager: CredentialsManager) -> Self {
        Self {
            manager,
            write_lock: Mutex::new(()),
        }
    }

    /// Get a reference to the underlying credentials manager.
    pub fn manager(&self) -> &CredentialsManager {
        &self.manager
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

#[async_trait]
impl CredentialsProvider for FileCredentialsProvider {
    async fn load(&self) -> Result<Option<SessionCredential>, CredentialsError> {
        self.manager.load()
    }

    async fn save(&self, credential: &SessionCredential) -> Result<(), CredentialsError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.manager.save(credential)
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.manager.clear()
    }
}
