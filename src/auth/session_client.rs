//! Luma admin API client with a cookie-based session.
//!
//! Two endpoints are used:
//! - `POST /auth/sign-in-with-password` to obtain the session cookie
//! - `GET /event/admin/get-guest` to look a guest up by proxy key
//!
//! The remote service is treated as unreliable: every status, empty body,
//! and malformed payload is classified into a typed result instead of
//! bubbling up as a fault.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;

use super::cookies::cookie_header;
use super::credentials::SessionCredential;
use crate::error::AuthError;
use crate::models::{CheckInRequest, CheckInResult, GuestLookupResponse};
use crate::startup::ApiSettings;
use crate::traits::{CredentialsProvider, Headers, HttpClient, Response, SessionApi};

const SIGN_IN_PATH: &str = "/auth/sign-in-with-password";
const GET_GUEST_PATH: &str = "/event/admin/get-guest";

/// Longest body excerpt carried in error details.
const BODY_EXCERPT_CHARS: usize = 200;

fn body_excerpt(response: &Response) -> String {
    String::from_utf8_lossy(&response.body)
        .chars()
        .take(BODY_EXCERPT_CHARS)
        .collect()
}

/// Client for sign-in and guest check-in.
pub struct SessionClient {
    settings: ApiSettings,
    http: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialsProvider>,
    /// Serializes sign-in so concurrent callers never interleave credential writes
    auth_lock: tokio::sync::Mutex<()>,
    span: tracing::Span,
}

impl SessionClient {
    pub fn new(
        settings: ApiSettings,
        http: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self {
            settings,
            http,
            credentials,
            auth_lock: tokio::sync::Mutex::new(()),
            span: tracing::info_span!("session"),
        }
    }

    /// Log inside `span` instead of the default `session` span.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn base_headers(&self) -> Headers {
        self.settings.headers.clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionCredential, AuthError> {
        let _guard = self.auth_lock.lock().await;
        tracing::info!("Signing in as {}", email);

        let url = self.endpoint(SIGN_IN_PATH);
        let body = serde_json::json!({ "email": email, "password": password }).to_string();
        let mut headers = self.base_headers();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = self
            .http
            .post(&url, &body, &headers)
            .await
            .map_err(|e| AuthError::Transport {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(AuthError::SignInRejected {
                status: response.status,
                message: body_excerpt(&response),
            });
        }

        let required = self.settings.session_cookie_name.as_deref();
        let cookie = cookie_header(&response.set_cookies, required).ok_or_else(|| {
            tracing::error!(
                "Sign-in returned {} Set-Cookie header(s), none usable",
                response.set_cookies.len()
            );
            AuthError::MissingSessionToken
        })?;

        let credential = SessionCredential::new(cookie, Some(email.to_string()));
        self.credentials
            .save(&credential)
            .await
            .map_err(|e| AuthError::CredentialStore {
                message: e.to_string(),
            })?;

        tracing::info!("Session saved ({})", credential.redacted());
        Ok(credential)
    }

    async fn lookup_guest(&self, request: &CheckInRequest) -> CheckInResult {
        let credential = match self.credentials.load().await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::warn!("No stored session");
                return CheckInResult::AuthExpired;
            }
            Err(e) => {
                tracing::error!("Could not load session: {}", e);
                return CheckInResult::TransportError(e.to_string());
            }
        };

        let url = match reqwest::Url::parse_with_params(
            &self.endpoint(GET_GUEST_PATH),
            &[
                ("event_api_id", request.event_id.as_str()),
                ("proxy_key", request.proxy_key.as_str()),
            ],
        ) {
            Ok(url) => url,
            Err(e) => return CheckInResult::TransportError(format!("invalid URL: {}", e)),
        };

        let mut headers = self.base_headers();
        headers.insert("Cookie".to_string(), credential.cookie.clone());

        tracing::debug!("GET {}", url);
        let response = match self.http.get(url.as_str(), &headers).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Guest lookup failed: {}", e);
                return CheckInResult::TransportError(e.to_string());
            }
        };

        classify_guest_response(&response)
    }
}

/// Map a guest lookup response onto a [`CheckInResult`].
pub fn classify_guest_response(response: &Response) -> CheckInResult {
    match response.status {
        401 => {
            tracing::warn!("Session rejected (401)");
            return CheckInResult::AuthExpired;
        }
        404 => {
            tracing::warn!("Guest not found (404)");
            return CheckInResult::GuestNotFound;
        }
        _ => {}
    }

    if !response.is_success() {
        return CheckInResult::TransportError(format!(
            "unexpected status {}: {}",
            response.status,
            body_excerpt(response)
        ));
    }

    if response.is_blank() {
        tracing::error!("Empty response body (status {})", response.status);
        return CheckInResult::TransportError("empty response body".to_string());
    }

    match response.json::<GuestLookupResponse>() {
        Ok(lookup) => {
            let guest = lookup.into_guest();
            CheckInResult::Success {
                guest_name: guest.display_name().to_string(),
                already_checked_in: guest.is_checked_in(),
                checked_in_at: guest.checked_in_at(),
                guest_email: guest.email,
            }
        }
        Err(e) => {
            tracing::error!("Invalid JSON response: {}", e);
            CheckInResult::TransportError(format!(
                "invalid JSON ({}): {}",
                e,
                body_excerpt(response)
            ))
        }
    }
}

#[async_trait]
impl SessionApi for SessionClient {
    async fn has_session(&self) -> bool {
        self.credentials.has().await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionCredential, AuthError> {
        self.sign_in(email, password)
            .instrument(self.span.clone())
            .await
    }

    async fn check_in(&self, request: &CheckInRequest) -> CheckInResult {
        let span = tracing::info_span!(
            parent: &self.span,
            "check_in",
            event_id = %request.event_id,
            proxy_key = %request.proxy_key
        );
        self.lookup_guest(request).instrument(span).await
    }
}
