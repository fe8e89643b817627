//! In-memory credentials provider for testing.
//!
//! Stores the session credential in memory so tests can verify credential
//! operations without touching the file system.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::auth::SessionCredential;
use crate::traits::{CredentialsError, CredentialsProvider};

/// In-memory credentials provider for testing.
///
/// Clones share the same storage, so a test can keep a handle while the
/// code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    credential: Arc<Mutex<Option<SessionCredential>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
    clear_should_fail: Arc<Mutex<bool>>,
    save_count: Arc<Mutex<usize>>,
}

impl InMemoryCredentials {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding an initial credential.
    pub fn with_credential(credential: SessionCredential) -> Self {
        let provider = Self::default();
        provider.set_credential(Some(credential));
        provider
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether clear should fail.
    pub fn set_clear_should_fail(&self, should_fail: bool) {
        *self.clear_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the current credential synchronously.
    pub fn get_credential(&self) -> Option<SessionCredential> {
        self.credential.lock().unwrap().clone()
    }

    /// Set the credential synchronously.
    pub fn set_credential(&self, credential: Option<SessionCredential>) {
        *self.credential.lock().unwrap() = credential;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<SessionCredential>, CredentialsError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(CredentialsError::Serialization(
                "Mock load failure".to_string(),
            ));
        }

        Ok(self.credential.lock().unwrap().clone())
    }

    async fn save(&self, credential: &SessionCredential) -> Result<(), CredentialsError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("Mock save failure".to_string()));
        }

        *self.credential.lock().unwrap() = Some(credential.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        if *self.clear_should_fail.lock().unwrap() {
            return Err(CredentialsError::ClearFailed("Mock clear failure".to_string()));
        }

        *self.credential.lock().unwrap() = None;
        Ok(())
    }
}
