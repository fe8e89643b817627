use std::time::Instant;

/// A string decoded from a QR symbol, stamped with the instant it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub text: String,
    pub detected_at: Instant,
}

impl DecodedPayload {
    pub fn new(text: impl Into<String>, detected_at: Instant) -> Self {
        Self {
            text: text.into(),
            detected_at,
        }
    }
}

/// Event id and guest proxy key extracted from a check-in QR code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckInRequest {
    /// Event API id (`evt-...`)
    pub event_id: String,
    /// Guest proxy key (`g-...`)
    pub proxy_key: String,
}

impl CheckInRequest {
    pub fn new(event_id: impl Into<String>, proxy_key: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            proxy_key: proxy_key.into(),
        }
    }
}

/// Outcome of a single guest lookup against the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInResult {
    /// Guest was found. `already_checked_in` is set when the server reports
    /// an earlier check-in time.
    Success {
        guest_name: String,
        guest_email: Option<String>,
        already_checked_in: bool,
        checked_in_at: Option<String>,
    },
    /// The session credential is missing or was rejected (HTTP 401).
    AuthExpired,
    /// No guest matches the proxy key (HTTP 404).
    GuestNotFound,
    /// Network failure, unexpected status, or an unusable body.
    TransportError(String),
}

impl CheckInResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckInResult::Success { .. })
    }

    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            CheckInResult::Success { .. } => "success",
            CheckInResult::AuthExpired => "auth_expired",
            CheckInResult::GuestNotFound => "guest_not_found",
            CheckInResult::TransportError(_) => "transport_error",
        }
    }
}
