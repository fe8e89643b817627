//! Camera trait abstraction.
//!
//! A [`CameraOpener`] is one backend strategy; the scan loop tries a list of
//! them in preference order and keeps the first [`CameraDevice`] that opens.

use std::time::Duration;

use crate::scanner::Frame;

/// Requested capture parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    pub device_index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

/// Camera operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The backend could not open the device
    OpenFailed(String),
    /// A frame read failed; the device may recover
    ReadFailed(String),
    /// No frame arrived within the read timeout
    Timeout,
    /// The device was already released
    Released,
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::ReadFailed(msg) => write!(f, "Failed to read frame: {}", msg),
            CameraError::Timeout => write!(f, "Timed out waiting for frame"),
            CameraError::Released => write!(f, "Camera already released"),
        }
    }
}

impl std::error::Error for CameraError {}

/// An open capture device.
pub trait CameraDevice: Send {
    /// Read one frame, waiting at most `timeout`.
    fn read_frame(&mut self, timeout: Duration) -> Result<Frame, CameraError>;

    /// Release the device. Must be safe to call more than once.
    fn release(&mut self);
}

/// A backend strategy able to open a [`CameraDevice`].
pub trait CameraOpener: Send + Sync {
    /// Backend name used in logs and configuration.
    fn name(&self) -> &str;

    /// Open and configure the device; `Ok` means the device is ready to read.
    fn open(&self, settings: &CaptureSettings) -> Result<Box<dyn CameraDevice>, CameraError>;
}
