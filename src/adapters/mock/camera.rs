//! Scripted camera for testing the scan loop without hardware.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::scanner::Frame;
use crate::traits::{CameraDevice, CameraError, CameraOpener, CaptureSettings};

/// Upper bound on how long an empty mock camera sleeps per read.
const IDLE_READ: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct CameraState {
    queue: VecDeque<Result<Frame, CameraError>>,
    released: bool,
    release_count: usize,
    read_count: usize,
}

/// Mock camera device.
///
/// Frames and read errors are served in the order they were pushed. When the
/// queue is empty a read waits briefly and reports [`CameraError::Timeout`].
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockCamera {
    state: Arc<Mutex<CameraState>>,
}

impl MockCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&self, frame: Frame) {
        self.state.lock().unwrap().queue.push_back(Ok(frame));
    }

    pub fn push_error(&self, error: CameraError) {
        self.state.lock().unwrap().queue.push_back(Err(error));
    }

    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().unwrap().released
    }

    pub fn release_count(&self) -> usize {
        self.state.lock().unwrap().release_count
    }

    pub fn read_count(&self) -> usize {
        self.state.lock().unwrap().read_count
    }

    fn reopen(&self) {
        self.state.lock().unwrap().released = false;
    }
}

impl CameraDevice for MockCamera {
    fn read_frame(&mut self, timeout: Duration) -> Result<Frame, CameraError> {
        let next = {
            let mut state = self.state.lock().unwrap();
            if state.released {
                return Err(CameraError::Released);
            }
            state.read_count += 1;
            state.queue.pop_front()
        };

        match next {
            Some(result) => result,
            None => {
                thread::sleep(timeout.min(IDLE_READ));
                Err(CameraError::Timeout)
            }
        }
    }

    fn release(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.released = true;
        state.release_count += 1;
    }
}

/// Backend strategy handing out a shared [`MockCamera`], or failing.
#[derive(Debug, Clone)]
pub struct MockCameraOpener {
    name: String,
    camera: Option<MockCamera>,
    open_count: Arc<Mutex<usize>>,
    last_settings: Arc<Mutex<Option<CaptureSettings>>>,
}

impl MockCameraOpener {
    pub fn new(name: impl Into<String>, camera: MockCamera) -> Self {
        Self {
            name: name.into(),
            camera: Some(camera),
            open_count: Arc::new(Mutex::new(0)),
            last_settings: Arc::new(Mutex::new(None)),
        }
    }

    /// An opener whose device never becomes ready.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            camera: None,
            open_count: Arc::new(Mutex::new(0)),
            last_settings: Arc::new(Mutex::new(None)),
        }
    }

    pub fn open_count(&self) -> usize {
        *self.open_count.lock().unwrap()
    }

    pub fn last_settings(&self) -> Option<CaptureSettings> {
        self.last_settings.lock().unwrap().clone()
    }
}

impl CameraOpener for MockCameraOpener {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, settings: &CaptureSettings) -> Result<Box<dyn CameraDevice>, CameraError> {
        *self.open_count.lock().unwrap() += 1;
        *self.last_settings.lock().unwrap() = Some(settings.clone());
        match &self.camera {
            Some(camera) => {
                camera.reopen();
                Ok(Box::new(camera.clone()))
            }
            None => Err(CameraError::OpenFailed(format!("{} not ready", self.name))),
        }
    }
}
