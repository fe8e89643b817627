//! Check-in retry policy.
//!
//! ```text
//! TryCached ──────────────────────────────► done
//!     │ AuthExpired / no session
//!     ▼
//! Reauthenticate ──► RetryCheckIn ───────► done
//!     │ failure
//!     ▼
//! AuthFailed ─────────────────────────────► done
//! ```
//!
//! Only an expired session triggers a sign-in, and at most one sign-in
//! happens per check-in.

use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::error::AuthError;
use crate::models::{CheckInRequest, CheckInResult};
use crate::startup::AccountCredentials;
use crate::traits::SessionApi;

/// Final outcome of one orchestrated check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The guest lookup ran; the result may still be a failure.
    Completed(CheckInResult),
    /// Re-authentication failed, so the lookup was not retried.
    AuthFailed(AuthError),
}

impl CheckInOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckInOutcome::Completed(result) if result.is_success())
    }

    pub fn result(&self) -> Option<&CheckInResult> {
        match self {
            CheckInOutcome::Completed(result) => Some(result),
            CheckInOutcome::AuthFailed(_) => None,
        }
    }
}

pub struct CheckInOrchestrator<S: SessionApi> {
    session: S,
    account: AccountCredentials,
    span: Span,
}

impl<S: SessionApi> CheckInOrchestrator<S> {
    pub fn new(session: S, account: AccountCredentials) -> Self {
        Self {
            session,
            account,
            span: Span::none(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Check a guest in, signing in again once if the session has expired.
    pub async fn check_in(&self, request: &CheckInRequest) -> CheckInOutcome {
        let span = tracing::info_span!(
            parent: &self.span,
            "check_in",
            attempt = %Uuid::new_v4(),
            event_id = %request.event_id,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &CheckInRequest) -> CheckInOutcome {
        if self.session.has_session().await {
            match self.session.check_in(request).await {
                CheckInResult::AuthExpired => {
                    tracing::info!("Session expired, signing in again");
                }
                result => return CheckInOutcome::Completed(result),
            }
        } else {
            tracing::info!("No stored session, signing in");
        }

        if let Err(e) = self
            .session
            .authenticate(&self.account.email, &self.account.password)
            .await
        {
            tracing::error!("[{}] {}", e.error_code(), e.user_message());
            return CheckInOutcome::AuthFailed(e);
        }

        let result = self.session.check_in(request).await;
        if result == CheckInResult::AuthExpired {
            tracing::warn!("Session rejected immediately after sign-in");
        }
        CheckInOutcome::Completed(result)
    }
}
