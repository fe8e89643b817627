//! Session credential storage for luma-door.
//!
//! The credential is a single JSON document, by default at
//! `~/.luma-door/credentials.json`:
//!
//! ```json
//! { "cookie": "luma.auth-session-key=...", "email": "door@example.com", "saved_at": 1714580000 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::traits::CredentialsError;

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".luma-door";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Opaque session credential obtained from password sign-in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCredential {
    /// Cookie header value replayed on every authenticated request.
    pub cookie: String,
    /// Account the session belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// When the credential was saved, as Unix timestamp (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<i64>,
}

impl SessionCredential {
    /// Create a credential stamped with the current time.
    pub fn new(cookie: impl Into<String>, email: Option<String>) -> Self {
        Self {
            cookie: cookie.into(),
            email,
            saved_at: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// Check if the credential carries a cookie at all.
    pub fn has_cookie(&self) -> bool {
        !self.cookie.trim().is_empty()
    }

    /// Cookie prefix safe for log lines.
    pub fn redacted(&self) -> String {
        let prefix: String = self.cookie.chars().take(12).collect();
        format!("{}...", prefix)
    }
}

/// Manages credential storage and retrieval on disk.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a CredentialsManager at the default location.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self {
            credentials_path: home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
        })
    }

    /// Create a CredentialsManager for an explicit file path.
    pub fn with_path(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load the credential from disk.
    ///
    /// A missing file, or a file without a cookie, is `Ok(None)`. Corrupt
    /// JSON is an error.
    pub fn load(&self) -> Result<Option<SessionCredential>, CredentialsError> {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CredentialsError::LoadFailed(e.to_string())),
        };

        let reader = BufReader::new(file);
        let credential: SessionCredential = serde_json::from_reader(reader)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;

        if credential.has_cookie() {
            Ok(Some(credential))
        } else {
            Ok(None)
        }
    }

    /// Save the credential, replacing the file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, credential: &SessionCredential) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CredentialsError::Io(e.to_string()))?;
            }
        }

        let file = File::create(&self.credentials_path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credential)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;

        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    /// Remove the credentials file. Succeeds if it didn't exist.
    pub fn clear(&self) -> Result<(), CredentialsError> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialsError::ClearFailed(e.to_string())),
        }
    }

    /// Check whether a credential with a cookie is stored.
    pub fn has(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CredentialsManager {
        CredentialsManager::with_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    #[test]
    fn test_session_credential_new_sets_timestamp() {
        let cred = SessionCredential::new("a=1", Some("door@example.com".to_string()));
        assert!(cred.saved_at.is_some());
        assert!(cred.has_cookie());
    }

    #[test]
    fn test_session_credential_redacted() {
        let cred = SessionCredential::new("luma.auth-session-key=supersecret", None);
        assert_eq!(cred.redacted(), "luma.auth-se...");
    }

    #[test]
    fn test_credentials_manager_new() {
        let manager = CredentialsManager::new();
        assert!(manager.is_some());
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert_eq!(manager.load().unwrap(), None);
        assert!(!manager.has());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let cred = SessionCredential {
            cookie: "luma.auth-session-key=abc".to_string(),
            email: Some("door@example.com".to_string()),
            saved_at: Some(1_714_580_000),
        };
        manager.save(&cred).unwrap();

        assert_eq!(manager.load().unwrap(), Some(cred));
        assert!(manager.has());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&SessionCredential::new("old=1", None)).unwrap();
        manager.save(&SessionCredential::new("new=2", None)).unwrap();

        assert_eq!(manager.load().unwrap().unwrap().cookie, "new=2");
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        manager.save(&SessionCredential::new("a=1", None)).unwrap();
        assert!(manager.credentials_path().exists());

        manager.clear().unwrap();
        assert!(!manager.credentials_path().exists());
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_clear_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert!(manager.clear().is_ok());
    }

    #[test]
    fn test_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(!manager.credentials_path().parent().unwrap().exists());
        manager.save(&SessionCredential::new("a=1", None)).unwrap();
        assert!(manager.credentials_path().parent().unwrap().exists());
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), "not valid json").unwrap();

        assert!(matches!(
            manager.load(),
            Err(CredentialsError::Serialization(_))
        ));
        assert!(!manager.has());
    }

    #[test]
    fn test_load_cookie_only_document() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), r#"{"cookie": "a=1; b=2"}"#).unwrap();

        let loaded = manager.load().unwrap().unwrap();
        assert_eq!(loaded.cookie, "a=1; b=2");
        assert_eq!(loaded.email, None);
    }

    #[test]
    fn test_load_empty_cookie_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), r#"{"cookie": ""}"#).unwrap();

        assert_eq!(manager.load().unwrap(), None);
    }
}
