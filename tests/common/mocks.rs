//! Mock implementations for test fixtures.
//!
//! Re-exports the mocks from `luma_door::adapters::mock` and adds builders
//! for common Luma API responses.

#![allow(dead_code)]

pub use luma_door::adapters::mock::http::MockResponse;
pub use luma_door::adapters::mock::{
    InMemoryCredentials, MockCamera, MockCameraOpener, MockHttpClient, MockSessionApi,
    SessionCall,
};
pub use luma_door::traits::{Headers, HttpClient, HttpError, Response};

use bytes::Bytes;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a JSON response for a URL prefix.
    pub fn with_json_response(self, url: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Configures a sign-in response carrying `Set-Cookie` headers.
    pub fn with_sign_in(self, url: &str, set_cookies: &[&str]) -> Self {
        let response = Response::new(200, Bytes::from_static(b"{}"))
            .with_set_cookies(set_cookies.iter().map(|c| c.to_string()).collect());
        self.client.set_response(url, MockResponse::Success(response));
        self
    }

    /// Configures a transport failure.
    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.client.set_response(url, MockResponse::Error(error));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
