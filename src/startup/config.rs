//! Runtime configuration.
//!
//! Settings are read from a JSON file with one object per section. Every
//! field has a default, so a partial (or missing) file is fine:
//!
//! ```json
//! {
//!   "api": { "base_url": "https://api.lu.ma", "session_cookie_name": "luma.auth-session-key" },
//!   "camera": { "device_index": 0, "frame_width": 1280, "frame_height": 720, "backends": ["v4l2", "auto"] },
//!   "qr": { "url_pattern": "https://lu.ma/check-in/", "duplicate_window_ms": 2500, "frame_skip": 2 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::traits::CaptureSettings;

/// Default Luma API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.lu.ma";

/// Default check-in URL prefix encoded in guest QR codes.
pub const DEFAULT_URL_PATTERN: &str = "https://lu.ma/check-in/";

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Extra headers sent with every request (user agent, origin, ...)
    pub headers: HashMap<String, String>,
    /// When set, sign-in must return this cookie to count as authenticated
    pub session_cookie_name: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: HashMap::new(),
            session_cookie_name: None,
            timeout_secs: 15,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Set the base URL (trailing slashes are dropped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.session_cookie_name = Some(name.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub device_index: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub fps: u32,
    /// Backend preference order (`auto`, `v4l2`, `avfoundation`, `msmf`)
    pub backends: Vec<String>,
    /// Upper bound on a blocking frame read
    pub read_timeout_ms: u64,
    /// Pause after a failed frame read
    pub read_backoff_ms: u64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            frame_width: 640,
            frame_height: 480,
            fps: 30,
            backends: vec!["auto".to_string()],
            read_timeout_ms: 500,
            read_backoff_ms: 100,
        }
    }
}

impl CameraSettings {
    pub fn capture(&self) -> CaptureSettings {
        CaptureSettings {
            device_index: self.device_index,
            width: self.frame_width,
            height: self.frame_height,
            fps: self.fps,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn read_backoff(&self) -> Duration {
        Duration::from_millis(self.read_backoff_ms)
    }
}

/// QR detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrSettings {
    pub url_pattern: String,
    /// Identical payloads inside this window are emitted once
    pub duplicate_window_ms: u64,
    /// Decode every Nth frame
    pub frame_skip: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            url_pattern: DEFAULT_URL_PATTERN.to_string(),
            duplicate_window_ms: 2500,
            frame_skip: 2,
        }
    }
}

impl QrSettings {
    pub fn duplicate_window(&self) -> Duration {
        Duration::from_millis(self.duplicate_window_ms)
    }
}

/// Credential storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Defaults to `~/.luma-door/credentials.json`
    pub credentials_path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for a timestamped log file; stdout only when unset
    pub directory: Option<PathBuf>,
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            filter: "info".to_string(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub camera: CameraSettings,
    pub qr: QrSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a JSON file.
    ///
    /// A missing file yields defaults; unreadable or invalid files are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse settings from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Default config file location: `config/settings.json` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config").join("settings.json")
    }

    /// Resolve the credentials file path.
    pub fn credentials_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.credentials_path {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".luma-door").join("credentials.json"))
                .ok_or(ConfigError::NoHomeDir),
        }
    }

    pub fn with_api(mut self, api: ApiSettings) -> Self {
        self.api = api;
        self
    }

    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_qr(mut self, qr: QrSettings) -> Self {
        self.qr = qr;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.credentials_path = Some(path.into());
        self
    }
}
