//! Camera-driven scan loop.
//!
//! The loop owns the camera for as long as it runs. It pulls frames, hands
//! every Nth one to the [`QrDecoder`], validates each payload with the
//! [`PayloadParser`] and invokes the callback with
//! `(raw_payload, event_id, proxy_key)` on the scan thread.
//!
//! [`ScanLoop::stop`] may be called from any thread, including a Ctrl+C
//! handler. Reads are bounded by the read timeout so the loop notices a stop
//! request promptly.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::Span;

use super::decoder::QrDecoder;
use super::payload::PayloadParser;
use crate::error::DeviceError;
use crate::startup::config::{CameraSettings, QrSettings};
use crate::traits::{CameraDevice, CameraError, CameraOpener, CaptureSettings};

/// Callback invoked with `(raw_payload, event_id, proxy_key)`.
pub type ScanCallback = Arc<dyn Fn(&str, &str, &str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Stopped,
    Running,
}

/// Loop tuning, usually derived from [`CameraSettings`] and [`QrSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub capture: CaptureSettings,
    /// Process every Nth frame. Zero is treated as one.
    pub frame_skip: u32,
    pub read_timeout: Duration,
    pub read_backoff: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default(), &QrSettings::default())
    }
}

impl ScanOptions {
    pub fn from_settings(camera: &CameraSettings, qr: &QrSettings) -> Self {
        Self {
            capture: camera.capture(),
            frame_skip: qr.frame_skip,
            read_timeout: camera.read_timeout(),
            read_backoff: camera.read_backoff(),
        }
    }

    pub fn with_frame_skip(mut self, frame_skip: u32) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_read_backoff(mut self, backoff: Duration) -> Self {
        self.read_backoff = backoff;
        self
    }
}

/// Counters for a scan session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub frames_read: u64,
    pub frames_decoded: u64,
    pub payloads_emitted: u64,
}

struct Shared {
    running: AtomicBool,
    /// Bumped on every successful start so a worker left over from an
    /// earlier session never touches the current camera.
    generation: AtomicU64,
    camera: Mutex<Option<Box<dyn CameraDevice>>>,
    decoder: Mutex<QrDecoder>,
    parser: PayloadParser,
    options: ScanOptions,
    frames_read: AtomicU64,
    frames_decoded: AtomicU64,
    payloads_emitted: AtomicU64,
    span: Span,
}

impl Shared {
    fn lock_camera(&self) -> MutexGuard<'_, Option<Box<dyn CameraDevice>>> {
        self.camera.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_decoder(&self) -> MutexGuard<'_, QrDecoder> {
        self.decoder.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.running.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    fn release_camera(&self) {
        if let Some(mut camera) = self.lock_camera().take() {
            camera.release();
            tracing::debug!(parent: &self.span, "Camera released");
        }
    }

    fn stop(&self) {
        let was_running = self.running.swap(false, Ordering::SeqCst);
        self.release_camera();
        if was_running {
            tracing::info!(parent: &self.span, "QR scanning stopped");
        }
    }
}

/// Releases the camera when the loop exits, however it exits.
struct ReleaseGuard<'a> {
    shared: &'a Shared,
    generation: u64,
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        if self.shared.generation.load(Ordering::SeqCst) == self.generation {
            self.shared.running.store(false, Ordering::SeqCst);
            self.shared.release_camera();
        }
    }
}

/// Cloneable handle that stops a running [`ScanLoop`]. Suitable for signal
/// handlers.
#[derive(Clone)]
pub struct StopHandle(Arc<Shared>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.stop();
    }
}

pub struct ScanLoop {
    openers: Vec<Arc<dyn CameraOpener>>,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ScanLoop {
    /// `openers` are tried in order when the camera is opened.
    pub fn new(
        openers: Vec<Arc<dyn CameraOpener>>,
        decoder: QrDecoder,
        parser: PayloadParser,
        options: ScanOptions,
    ) -> Self {
        Self {
            openers,
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                camera: Mutex::new(None),
                decoder: Mutex::new(decoder),
                parser,
                options,
                frames_read: AtomicU64::new(0),
                frames_decoded: AtomicU64::new(0),
                payloads_emitted: AtomicU64::new(0),
                span: Span::none(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Must be called before the loop is shared.
    pub fn with_span(mut self, span: Span) -> Self {
        if let Some(shared) = Arc::get_mut(&mut self.shared) {
            shared.span = span;
        }
        self
    }

    pub fn state(&self) -> ScanState {
        if self.shared.running.load(Ordering::SeqCst) {
            ScanState::Running
        } else {
            ScanState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == ScanState::Running
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.shared))
    }

    pub fn stats(&self) -> ScanStats {
        ScanStats {
            frames_read: self.shared.frames_read.load(Ordering::Relaxed),
            frames_decoded: self.shared.frames_decoded.load(Ordering::Relaxed),
            payloads_emitted: self.shared.payloads_emitted.load(Ordering::Relaxed),
        }
    }

    /// Open the camera and scan on the calling thread until stopped.
    ///
    /// Returns immediately with `Ok` if the loop is already running.
    pub fn start<F>(&self, callback: F) -> Result<(), DeviceError>
    where
        F: Fn(&str, &str, &str) + Send + Sync + 'static,
    {
        let Some(generation) = self.begin()? else {
            return Ok(());
        };
        let callback: ScanCallback = Arc::new(callback);
        let _enter = self.shared.span.enter();
        run(&self.shared, generation, &callback);
        Ok(())
    }

    /// Open the camera on the calling thread, then scan on a dedicated
    /// worker thread. Returns once the worker is running.
    pub fn start_async<F>(&self, callback: F) -> Result<(), DeviceError>
    where
        F: Fn(&str, &str, &str) + Send + Sync + 'static,
    {
        let mut worker = self.worker.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = worker.take() {
            if self.is_running() {
                tracing::warn!(parent: &self.shared.span, "Scanning already in progress");
                *worker = Some(handle);
                return Ok(());
            }
            // Previous worker is winding down; its read timeout bounds this.
            if handle.join().is_err() {
                tracing::warn!(parent: &self.shared.span, "Previous scan worker panicked");
            }
        }

        let Some(generation) = self.begin()? else {
            return Ok(());
        };

        let shared = Arc::clone(&self.shared);
        let callback: ScanCallback = Arc::new(callback);
        let spawned = thread::Builder::new()
            .name("qr-scan".to_string())
            .spawn(move || {
                let _enter = shared.span.enter();
                run(&shared, generation, &callback);
            });

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.stop();
                Err(DeviceError::WorkerSpawn(e.to_string()))
            }
        }
    }

    /// Stop scanning and release the camera. Idempotent.
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Block until the worker started by [`start_async`](Self::start_async)
    /// has exited.
    pub fn join(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::warn!(parent: &self.shared.span, "Scan worker panicked");
            }
        }
    }

    /// Claim the running flag and open the camera. `None` means there is
    /// nothing to run (already running, or stopped while opening).
    fn begin(&self) -> Result<Option<u64>, DeviceError> {
        let span = &self.shared.span;
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!(parent: span, "Scanning already in progress");
            return Ok(None);
        }

        let device = match self.open_camera() {
            Ok(device) => device,
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                tracing::error!(parent: span, "Failed to open camera: {}", e);
                return Err(e);
            }
        };

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.shared.lock_camera() = Some(device);

        if !self.shared.running.load(Ordering::SeqCst) {
            self.shared.release_camera();
            return Ok(None);
        }

        tracing::info!(parent: span, "QR scanning started");
        Ok(Some(generation))
    }

    fn open_camera(&self) -> Result<Box<dyn CameraDevice>, DeviceError> {
        if self.openers.is_empty() {
            return Err(DeviceError::NoBackendsConfigured);
        }

        let capture = &self.shared.options.capture;
        let span = &self.shared.span;
        let mut attempts = Vec::with_capacity(self.openers.len());
        for opener in &self.openers {
            match opener.open(capture) {
                Ok(device) => {
                    tracing::info!(
                        parent: span,
                        "Camera {} opened with {} backend ({}x{} @ {} fps)",
                        capture.device_index,
                        opener.name(),
                        capture.width,
                        capture.height,
                        capture.fps
                    );
                    return Ok(device);
                }
                Err(e) => {
                    tracing::warn!(parent: span, "{} backend failed: {}", opener.name(), e);
                    attempts.push(format!("{}: {}", opener.name(), e));
                }
            }
        }

        Err(DeviceError::NoBackendAvailable {
            device_index: capture.device_index,
            attempts,
        })
    }
}

impl Drop for ScanLoop {
    fn drop(&mut self) {
        self.shared.stop();
        self.join();
    }
}

fn run(shared: &Shared, generation: u64, callback: &ScanCallback) {
    let _guard = ReleaseGuard { shared, generation };
    let options = &shared.options;
    let skip = u64::from(options.frame_skip.max(1));
    let mut frame_index: u64 = 0;

    while shared.is_current(generation) {
        let read = {
            let mut camera = shared.lock_camera();
            match camera.as_mut() {
                Some(device) => device.read_frame(options.read_timeout),
                None => break,
            }
        };

        let frame = match read {
            Ok(frame) => frame,
            Err(CameraError::Timeout) => continue,
            Err(CameraError::Released) => break,
            Err(e) => {
                tracing::warn!("{}", e);
                thread::sleep(options.read_backoff);
                continue;
            }
        };

        shared.frames_read.fetch_add(1, Ordering::Relaxed);
        let process = frame_index % skip == 0;
        frame_index = frame_index.wrapping_add(1);
        if !process {
            continue;
        }

        shared.frames_decoded.fetch_add(1, Ordering::Relaxed);
        let payloads = shared.lock_decoder().decode(&frame);
        drop(frame);

        for payload in payloads {
            match shared.parser.parse(&payload.text) {
                Ok(request) => {
                    tracing::info!(
                        "Check-in code detected: event={} proxy_key={}",
                        request.event_id,
                        request.proxy_key
                    );
                    shared.payloads_emitted.fetch_add(1, Ordering::Relaxed);
                    callback(&payload.text, &request.event_id, &request.proxy_key);
                }
                Err(e) => {
                    tracing::debug!("Ignoring QR code {:?}: {}", payload.text, e);
                }
            }
            if !shared.is_current(generation) {
                break;
            }
        }
    }
}
