//! Door application: ties detections from the scan loop to check-ins.

use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::Span;

use crate::checkin::{CheckInOrchestrator, CheckInOutcome};
use crate::error::{DeviceError, ParseError};
use crate::models::{CheckInRequest, CheckInResult};
use crate::scanner::{PayloadParser, ScanLoop};
use crate::traits::SessionApi;

/// One-line, human-readable description of an outcome.
pub fn describe_outcome(outcome: &CheckInOutcome) -> String {
    match outcome {
        CheckInOutcome::Completed(CheckInResult::Success {
            guest_name,
            guest_email,
            already_checked_in,
            checked_in_at,
        }) => {
            let who = match guest_email {
                Some(email) => format!("{} <{}>", guest_name, email),
                None => guest_name.clone(),
            };
            if *already_checked_in {
                format!(
                    "{} was already checked in at {}",
                    who,
                    checked_in_at.as_deref().unwrap_or("an unknown time")
                )
            } else {
                format!("Checked in {}", who)
            }
        }
        CheckInOutcome::Completed(CheckInResult::AuthExpired) => {
            "Check-in failed: session rejected after signing in".to_string()
        }
        CheckInOutcome::Completed(CheckInResult::GuestNotFound) => {
            "Check-in failed: guest not found for this event".to_string()
        }
        CheckInOutcome::Completed(CheckInResult::TransportError(detail)) => {
            format!("Check-in failed: {}", detail)
        }
        CheckInOutcome::AuthFailed(e) => format!("Sign-in failed: {}", e.user_message()),
    }
}

fn report(outcome: &CheckInOutcome) {
    let message = describe_outcome(outcome);
    match outcome {
        CheckInOutcome::Completed(CheckInResult::Success { .. }) => tracing::info!("{}", message),
        CheckInOutcome::Completed(CheckInResult::GuestNotFound) => tracing::warn!("{}", message),
        _ => tracing::error!("{}", message),
    }
}

pub struct DoorApp<S: SessionApi> {
    orchestrator: CheckInOrchestrator<S>,
    runtime: Handle,
    span: Span,
}

impl<S: SessionApi + 'static> DoorApp<S> {
    /// `runtime` drives the async check-in from the (synchronous) scan thread.
    pub fn new(orchestrator: CheckInOrchestrator<S>, runtime: Handle) -> Self {
        Self {
            orchestrator,
            runtime,
            span: Span::none(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Handle one detection. Blocks until the check-in finishes, so must not
    /// be called from inside the runtime.
    pub fn handle_detection(
        &self,
        raw_payload: &str,
        event_id: &str,
        proxy_key: &str,
    ) -> CheckInOutcome {
        let _enter = self.span.enter();
        tracing::info!("==================================================");
        tracing::info!("QR code: {}", raw_payload);
        tracing::info!("Event: {}  Proxy key: {}", event_id, proxy_key);
        tracing::info!("==================================================");

        let request = CheckInRequest::new(event_id, proxy_key);
        let outcome = self.runtime.block_on(self.orchestrator.check_in(&request));
        report(&outcome);
        outcome
    }

    /// Parse a payload given on the command line and check it in.
    pub fn check_in_payload(
        &self,
        parser: &PayloadParser,
        payload: &str,
    ) -> Result<CheckInOutcome, ParseError> {
        let request = parser.parse(payload)?;
        Ok(self.handle_detection(payload, &request.event_id, &request.proxy_key))
    }

    /// Scan-loop callback. Check-in failures are reported and scanning continues.
    pub fn callback(self: &Arc<Self>) -> impl Fn(&str, &str, &str) + Send + Sync + 'static {
        let app = Arc::clone(self);
        move |raw, event_id, proxy_key| {
            app.handle_detection(raw, event_id, proxy_key);
        }
    }

    /// Start scanning on a worker thread and wait until the loop is stopped.
    pub fn run(self: &Arc<Self>, scan: &ScanLoop) -> Result<(), DeviceError> {
        scan.start_async(self.callback())?;
        tracing::info!("Ready, show a check-in QR code to the camera (Ctrl+C to quit)");
        scan.join();
        let stats = scan.stats();
        tracing::info!(
            "Scanner stopped: {} frames read, {} decoded, {} check-ins",
            stats.frames_read,
            stats.frames_decoded,
            stats.payloads_emitted
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockSessionApi;
    use crate::error::AuthError;
    use crate::startup::AccountCredentials;

    fn success(already: bool) -> CheckInResult {
        CheckInResult::Success {
            guest_name: "Ada".to_string(),
            guest_email: Some("ada@example.com".to_string()),
            already_checked_in: already,
            checked_in_at: already.then(|| "2024-05-01T18:00:00Z".to_string()),
        }
    }

    fn app(api: &MockSessionApi, runtime: &tokio::runtime::Runtime) -> DoorApp<MockSessionApi> {
        let orchestrator =
            CheckInOrchestrator::new(api.clone(), AccountCredentials::new("d@x.io", "pw"));
        DoorApp::new(orchestrator, runtime.handle().clone())
    }

    #[test]
    fn test_describe_first_check_in() {
        let text = describe_outcome(&CheckInOutcome::Completed(success(false)));
        assert_eq!(text, "Checked in Ada <ada@example.com>");
    }

    #[test]
    fn test_describe_already_checked_in() {
        let text = describe_outcome(&CheckInOutcome::Completed(success(true)));
        assert!(text.contains("already checked in at 2024-05-01T18:00:00Z"));
    }

    #[test]
    fn test_describe_auth_failed() {
        let text = describe_outcome(&CheckInOutcome::AuthFailed(AuthError::MissingSessionToken));
        assert!(text.starts_with("Sign-in failed"));
    }

    #[test]
    fn test_handle_detection_runs_orchestrator() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let api = MockSessionApi::with_session();
        api.push_check_in(success(false));

        let outcome = app(&api, &runtime).handle_detection(
            "https://lu.ma/check-in/evt-A?pk=g-B",
            "evt-A",
            "g-B",
        );

        assert!(outcome.is_success());
        assert_eq!(api.check_in_count(), 1);
    }

    #[test]
    fn test_check_in_payload_rejects_bad_payload() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let api = MockSessionApi::with_session();

        let result = app(&api, &runtime).check_in_payload(&PayloadParser::default(), "hello");

        assert!(matches!(result, Err(ParseError::PrefixMismatch { .. })));
        assert_eq!(api.check_in_count(), 0);
    }

    #[test]
    fn test_callback_from_worker_thread() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let api = MockSessionApi::with_session();
        api.push_check_in(success(false));
        let app = Arc::new(app(&api, &runtime));

        let callback = app.callback();
        std::thread::spawn(move || callback("raw", "evt-A", "g-B"))
            .join()
            .unwrap();

        assert_eq!(api.check_in_count(), 1);
    }
}
