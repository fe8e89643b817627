//! Native camera capture through `nokhwa`.
//!
//! A nokhwa `Camera` is not `Send`, so each opened device lives on its own
//! capture thread and hands frames over a bounded channel. The scan loop
//! reads with a timeout, which keeps `stop()` responsive even when the
//! driver stalls.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::scanner::Frame;
use crate::traits::{CameraDevice, CameraError, CameraOpener, CaptureSettings};

/// How long to wait for a backend to report readiness.
const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

type FrameResult = Result<Frame, String>;

/// Backend strategy for one nokhwa capture API.
#[derive(Debug, Clone)]
pub struct NokhwaOpener {
    name: String,
    backend: ApiBackend,
}

impl NokhwaOpener {
    /// Map a configured backend name to an opener. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let backend = match name.to_ascii_lowercase().as_str() {
            "auto" => ApiBackend::Auto,
            "v4l2" | "v4l" | "video4linux" => ApiBackend::Video4Linux,
            "avfoundation" => ApiBackend::AVFoundation,
            "msmf" | "mediafoundation" => ApiBackend::MediaFoundation,
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            backend,
        })
    }
}

impl CameraOpener for NokhwaOpener {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, settings: &CaptureSettings) -> Result<Box<dyn CameraDevice>, CameraError> {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let (frame_tx, frame_rx) = mpsc::sync_channel::<FrameResult>(1);
        let running = Arc::new(AtomicBool::new(true));

        let backend = self.backend;
        let capture = settings.clone();
        let thread_running = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name(format!("camera-{}", self.name))
            .spawn(move || capture_thread(backend, capture, ready_tx, frame_tx, thread_running))
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(Box::new(NokhwaCamera {
                frames: frame_rx,
                running,
                thread: Some(handle),
            })),
            Ok(Err(message)) => {
                let _ = handle.join();
                Err(CameraError::OpenFailed(message))
            }
            Err(_) => {
                // Leave the thread to notice the flag; joining could hang on the driver.
                running.store(false, Ordering::SeqCst);
                Err(CameraError::OpenFailed(format!(
                    "{} did not become ready within {:?}",
                    self.name, OPEN_TIMEOUT
                )))
            }
        }
    }
}

fn capture_thread(
    backend: ApiBackend,
    settings: CaptureSettings,
    ready: mpsc::Sender<Result<(), String>>,
    frames: SyncSender<FrameResult>,
    running: Arc<AtomicBool>,
) {
    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(
            Resolution::new(settings.width, settings.height),
            FrameFormat::MJPEG,
            settings.fps,
        ),
    ));

    let mut camera =
        match Camera::with_backend(CameraIndex::Index(settings.device_index), format, backend) {
            Ok(camera) => camera,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };

    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(e.to_string()));
        return;
    }
    let _ = ready.send(Ok(()));

    while running.load(Ordering::SeqCst) {
        let result = camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>())
            .map_err(|e| e.to_string())
            .and_then(|image| {
                let (width, height) = (image.width(), image.height());
                Frame::from_rgb(width, height, image.into_raw())
                    .ok_or_else(|| "frame buffer size mismatch".to_string())
            });

        match frames.try_send(result) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => break,
        }
    }

    if let Err(e) = camera.stop_stream() {
        tracing::debug!("Failed to stop camera stream: {}", e);
    }
}

/// An open nokhwa device served by its capture thread.
pub struct NokhwaCamera {
    frames: Receiver<FrameResult>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CameraDevice for NokhwaCamera {
    fn read_frame(&mut self, timeout: Duration) -> Result<Frame, CameraError> {
        if self.thread.is_none() {
            return Err(CameraError::Released);
        }
        match self.frames.recv_timeout(timeout) {
            Ok(Ok(frame)) => Ok(frame),
            Ok(Err(message)) => Err(CameraError::ReadFailed(message)),
            Err(RecvTimeoutError::Timeout) => Err(CameraError::Timeout),
            Err(RecvTimeoutError::Disconnected) => {
                Err(CameraError::ReadFailed("capture thread exited".to_string()))
            }
        }
    }

    fn release(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::warn!("Camera capture thread panicked");
            }
        }
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.release();
    }
}
