//! Mock implementations for testing.
//!
//! Test doubles for every trait in `crate::traits`, so components can be
//! exercised without a network, a file system or a camera.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`InMemoryCredentials`] - In-memory credential storage
//! - [`MockCamera`] / [`MockCameraOpener`] - Scripted frames and backends
//! - [`MockSessionApi`] - Scripted sign-in and check-in results

pub mod camera;
pub mod credentials;
pub mod http;
pub mod session;

pub use camera::{MockCamera, MockCameraOpener};
pub use credentials::InMemoryCredentials;
pub use http::MockHttpClient;
pub use session::{MockSessionApi, SessionCall};
