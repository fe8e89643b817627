//! Process-wide `tracing` subscriber.

use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use super::config::LoggingSettings;
use crate::error::ConfigError;

/// Log file name for a session started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Build the filter: `RUST_LOG` wins over the configured directive.
pub fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

fn create_log_file(directory: &Path) -> Result<(File, PathBuf), ConfigError> {
    fs::create_dir_all(directory).map_err(|e| ConfigError::Logging(e.to_string()))?;
    let path = directory.join(log_file_name(Local::now()));
    let file = File::create(&path).map_err(|e| ConfigError::Logging(e.to_string()))?;
    Ok((file, path))
}

/// Install the global subscriber: stdout, plus a log file when
/// `settings.directory` is set. Returns the log file path.
///
/// Calling this again once a subscriber is installed is a no-op.
pub fn init(settings: &LoggingSettings) -> Result<Option<PathBuf>, ConfigError> {
    let filter = build_filter(settings)?;

    let (file_layer, path) = match &settings.directory {
        Some(directory) => {
            let (file, path) = create_log_file(directory)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .with(file_layer)
        .try_init();

    match installed {
        Ok(()) => {
            if let Some(path) = &path {
                tracing::info!("Logging to {}", path.display());
            }
            Ok(path)
        }
        Err(e) => {
            tracing::debug!("Logging already initialized: {}", e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name_format() {
        let started = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(started), "20240309_070501.log");
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let settings = LoggingSettings {
            directory: None,
            filter: "luma_door=loudest".to_string(),
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(matches!(build_filter(&settings), Err(ConfigError::Logging(_))));
        }
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = LoggingSettings {
            directory: Some(dir.path().join("logs")),
            filter: "info".to_string(),
        };
        let _ = init(&settings).unwrap();
        assert!(dir.path().join("logs").is_dir());
        let _ = init(&settings).unwrap();
    }
}
