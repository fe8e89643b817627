//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),

    #[error("cannot determine home directory for default paths")]
    NoHomeDir,

    #[error("failed to set up logging: {0}")]
    Logging(String),
}
