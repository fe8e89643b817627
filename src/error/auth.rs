//! Authentication-related error types.
//!
//! These errors come out of password sign-in and are surfaced to the
//! check-in orchestrator as a final failure.

use std::fmt;

/// Sign-in error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The sign-in endpoint answered with a non-2xx status.
    SignInRejected { status: u16, message: String },

    /// Sign-in succeeded but no session cookie could be extracted.
    MissingSessionToken,

    /// The request never produced a response.
    Transport { message: String },

    /// The new credential could not be persisted.
    CredentialStore { message: String },
}

impl AuthError {
    /// Check if the account itself was refused (wrong email/password).
    pub fn is_rejected_credentials(&self) -> bool {
        matches!(
            self,
            AuthError::SignInRejected {
                status: 400 | 401 | 403,
                ..
            }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::SignInRejected { status, .. } => match *status {
                400 | 401 | 403 => {
                    "Sign-in was refused. Check LUMA_EMAIL and LUMA_PASSWORD.".to_string()
                }
                429 => "Sign-in is being rate limited. Try again later.".to_string(),
                _ => format!("Sign-in failed with status {}.", status),
            },
            AuthError::MissingSessionToken => {
                "Sign-in returned no session cookie.".to_string()
            }
            AuthError::Transport { .. } => {
                "Could not reach the sign-in endpoint.".to_string()
            }
            AuthError::CredentialStore { .. } => {
                "Could not save the session. Check file permissions.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::SignInRejected { .. } => "E_AUTH_REJECTED",
            AuthError::MissingSessionToken => "E_AUTH_NO_TOKEN",
            AuthError::Transport { .. } => "E_AUTH_TRANSPORT",
            AuthError::CredentialStore { .. } => "E_AUTH_STORE",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::SignInRejected { status, message } => {
                write!(f, "Sign-in rejected ({}): {}", status, message)
            }
            AuthError::MissingSessionToken => {
                write!(f, "No session token in sign-in response")
            }
            AuthError::Transport { message } => {
                write!(f, "Sign-in request failed: {}", message)
            }
            AuthError::CredentialStore { message } => {
                write!(f, "Failed to store session credential: {}", message)
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_rejected() {
        let err = AuthError::SignInRejected {
            status: 401,
            message: "bad password".to_string(),
        };
        assert!(err.is_rejected_credentials());
        assert_eq!(err.error_code(), "E_AUTH_REJECTED");
        assert!(err.user_message().contains("LUMA_PASSWORD"));
        assert_eq!(err.to_string(), "Sign-in rejected (401): bad password");
    }

    #[test]
    fn test_sign_in_server_error_not_credential_rejection() {
        let err = AuthError::SignInRejected {
            status: 502,
            message: String::new(),
        };
        assert!(!err.is_rejected_credentials());
        assert!(err.user_message().contains("502"));
    }

    #[test]
    fn test_missing_session_token() {
        let err = AuthError::MissingSessionToken;
        assert!(!err.is_rejected_credentials());
        assert_eq!(err.error_code(), "E_AUTH_NO_TOKEN");
        assert!(err.user_message().contains("session cookie"));
    }

    #[test]
    fn test_transport_and_store_codes() {
        let t = AuthError::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(t.error_code(), "E_AUTH_TRANSPORT");
        assert!(t.to_string().contains("connection refused"));

        let s = AuthError::CredentialStore {
            message: "read-only".to_string(),
        };
        assert_eq!(s.error_code(), "E_AUTH_STORE");
        assert!(s.to_string().contains("read-only"));
    }
}
