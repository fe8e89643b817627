//! Check-in payload parse errors.

use thiserror::Error;

/// Why a decoded QR string is not a check-in URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("payload is not valid percent-encoded UTF-8")]
    InvalidEncoding,

    #[error("payload does not start with {expected}")]
    PrefixMismatch { expected: String },

    #[error("payload has no ?pk= proxy key parameter")]
    MissingProxyKey,

    #[error("event id {0:?} does not start with evt-")]
    InvalidEventId(String),

    #[error("proxy key {0:?} does not start with g-")]
    InvalidProxyKey(String),
}
