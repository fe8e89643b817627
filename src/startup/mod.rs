//! Startup: configuration, account credentials and logging.
//!
//! # Components
//!
//! - [`config`] - `Settings` loaded from JSON
//! - [`account`] - Sign-in account from the environment
//! - [`logging`] - Global `tracing` subscriber
//!
//! # Usage
//!
//! ```ignore
//! use luma_door::startup::{logging, AccountCredentials, Settings};
//!
//! let settings = Settings::load(&Settings::default_path())?;
//! logging::init(&settings.logging)?;
//! let account = AccountCredentials::from_env()?;
//! ```

pub mod account;
pub mod config;
pub mod logging;

pub use account::AccountCredentials;
pub use config::{
    ApiSettings, CameraSettings, LoggingSettings, QrSettings, Settings, StorageSettings,
};
