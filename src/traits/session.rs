//! Session API trait abstraction.
//!
//! The check-in orchestrator only needs these three operations, which keeps
//! its retry policy testable without HTTP.

use async_trait::async_trait;

use crate::auth::SessionCredential;
use crate::error::AuthError;
use crate::models::{CheckInRequest, CheckInResult};

#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Whether a session credential is currently stored.
    async fn has_session(&self) -> bool;

    /// Sign in with a password and store the resulting session credential.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<SessionCredential, AuthError>;

    /// Look the guest up with the stored session. Never fails; every fault
    /// is classified into a [`CheckInResult`].
    async fn check_in(&self, request: &CheckInRequest) -> CheckInResult;
}
