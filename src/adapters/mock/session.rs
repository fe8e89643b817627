//! Scripted session API for testing the check-in orchestrator.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::auth::SessionCredential;
use crate::error::AuthError;
use crate::models::{CheckInRequest, CheckInResult};
use crate::traits::SessionApi;

/// One call made against [`MockSessionApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    HasSession,
    Authenticate { email: String },
    CheckIn(CheckInRequest),
}

#[derive(Debug)]
struct SessionState {
    has_session: bool,
    check_in_results: VecDeque<CheckInResult>,
    auth_result: Result<SessionCredential, AuthError>,
    calls: Vec<SessionCall>,
}

/// Mock [`SessionApi`].
///
/// `check_in` pops scripted results in order; once exhausted it returns a
/// transport error. A successful `authenticate` marks the session present.
#[derive(Debug, Clone)]
pub struct MockSessionApi {
    state: Arc<Mutex<SessionState>>,
}

impl Default for MockSessionApi {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                has_session: false,
                check_in_results: VecDeque::new(),
                auth_result: Ok(SessionCredential::new("session=mock", None)),
                calls: Vec::new(),
            })),
        }
    }
}

impl MockSessionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a stored session.
    pub fn with_session() -> Self {
        let api = Self::default();
        api.set_has_session(true);
        api
    }

    pub fn set_has_session(&self, present: bool) {
        self.state.lock().unwrap().has_session = present;
    }

    pub fn push_check_in(&self, result: CheckInResult) {
        self.state.lock().unwrap().check_in_results.push_back(result);
    }

    pub fn set_auth_result(&self, result: Result<SessionCredential, AuthError>) {
        self.state.lock().unwrap().auth_result = result;
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn authenticate_count(&self) -> usize {
        self.count(|c| matches!(c, SessionCall::Authenticate { .. }))
    }

    pub fn check_in_count(&self) -> usize {
        self.count(|c| matches!(c, SessionCall::CheckIn(_)))
    }

    fn count(&self, pred: impl Fn(&SessionCall) -> bool) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| pred(c)).count()
    }
}

#[async_trait]
impl SessionApi for MockSessionApi {
    async fn has_session(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SessionCall::HasSession);
        state.has_session
    }

    async fn authenticate(
        &self,
        email: &str,
        _password: &str,
    ) -> Result<SessionCredential, AuthError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SessionCall::Authenticate {
            email: email.to_string(),
        });
        let result = state.auth_result.clone();
        if result.is_ok() {
            state.has_session = true;
        }
        result
    }

    async fn check_in(&self, request: &CheckInRequest) -> CheckInResult {
        let mut state = self.state.lock().unwrap();
        state.calls.push(SessionCall::CheckIn(request.clone()));
        state
            .check_in_results
            .pop_front()
            .unwrap_or_else(|| CheckInResult::TransportError("no scripted result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_results_in_order() {
        let api = MockSessionApi::new();
        api.push_check_in(CheckInResult::AuthExpired);
        api.push_check_in(CheckInResult::GuestNotFound);
        let req = CheckInRequest::new("evt-1", "g-1");

        assert_eq!(api.check_in(&req).await, CheckInResult::AuthExpired);
        assert_eq!(api.check_in(&req).await, CheckInResult::GuestNotFound);
        assert!(matches!(
            api.check_in(&req).await,
            CheckInResult::TransportError(_)
        ));
        assert_eq!(api.check_in_count(), 3);
    }

    #[tokio::test]
    async fn test_authenticate_marks_session() {
        let api = MockSessionApi::new();
        assert!(!api.has_session().await);
        api.authenticate("a@b.c", "pw").await.unwrap();
        assert!(api.has_session().await);
        assert_eq!(
            api.calls()[1],
            SessionCall::Authenticate {
                email: "a@b.c".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failed_authenticate_leaves_no_session() {
        let api = MockSessionApi::new();
        api.set_auth_result(Err(AuthError::MissingSessionToken));
        assert!(api.authenticate("a@b.c", "pw").await.is_err());
        assert!(!api.has_session().await);
    }
}
