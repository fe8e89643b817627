//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`CredentialsProvider`] - Session credential storage and retrieval
//! - [`CameraOpener`] / [`CameraDevice`] - Camera backends and frame capture
//! - [`SessionApi`] - Sign-in and guest check-in

pub mod camera;
pub mod credentials;
pub mod http;
pub mod session;

pub use camera::{CameraDevice, CameraError, CameraOpener, CaptureSettings};
pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{Headers, HttpClient, HttpError, Response};
pub use session::SessionApi;
