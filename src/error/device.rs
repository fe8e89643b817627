//! Camera device errors.

use thiserror::Error;

/// The camera could not be brought up. Fatal to scanning, not to the process.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Every configured backend failed to open the device.
    #[error("no camera backend could open device {device_index}: {}", attempts.join("; "))]
    NoBackendAvailable {
        device_index: u32,
        attempts: Vec<String>,
    },

    /// No backend strategies were configured or compiled in.
    #[error("no camera backends configured")]
    NoBackendsConfigured,

    /// The scan worker thread could not be spawned.
    #[error("failed to spawn scan worker: {0}")]
    WorkerSpawn(String),
}
