//! Error types for luma-door.
//!
//! | Error | Raised by | Handling |
//! |-------|-----------|----------|
//! | [`DeviceError`] | scan loop start | fatal to scanning, not to the process |
//! | [`ParseError`] | payload parser | logged and dropped |
//! | [`AuthError`] | sign-in | final failure for the check-in attempt |
//! | [`ConfigError`] | startup | aborts startup |
//!
//! Transport failures are [`crate::traits::HttpError`] and are folded into
//! [`crate::models::CheckInResult::TransportError`]. Credential store
//! failures are [`crate::traits::CredentialsError`]. Per-frame decode
//! faults never leave the decoder.

mod auth;
mod config;
mod device;
mod parse;

pub use auth::AuthError;
pub use config::ConfigError;
pub use device::DeviceError;
pub use parse::ParseError;
