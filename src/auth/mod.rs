//! Authentication module for luma-door.
//!
//! - Session credential storage
//! - Session token extraction from sign-in responses
//! - Luma API client for sign-in and guest check-in

pub mod cookies;
pub mod credentials;
pub mod session_client;

pub use credentials::{CredentialsManager, SessionCredential};
pub use session_client::SessionClient;
