use std::fmt;

use crate::error::ConfigError;

/// Environment variable holding the Luma account email.
pub const EMAIL_ENV: &str = "LUMA_EMAIL";
/// Environment variable holding the Luma account password.
pub const PASSWORD_ENV: &str = "LUMA_PASSWORD";

/// Account used for password sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    pub email: String,
    pub password: String,
}

impl AccountCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read `LUMA_EMAIL` and `LUMA_PASSWORD`. Empty values count as missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let email = non_empty_var(EMAIL_ENV).ok_or(ConfigError::MissingEnv(EMAIL_ENV))?;
        let password = non_empty_var(PASSWORD_ENV).ok_or(ConfigError::MissingEnv(PASSWORD_ENV))?;
        Ok(Self::new(email, password))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}
