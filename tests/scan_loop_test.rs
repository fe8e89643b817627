//! Scan loop driven by a scripted camera showing rendered QR codes.

mod common;

use common::*;
use luma_door::error::DeviceError;
use luma_door::scanner::{PayloadParser, QrDecoder, ScanLoop, ScanOptions, ScanState};
use luma_door::traits::{CameraError, CameraOpener};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

type Emitted = Arc<Mutex<Vec<(String, String, String)>>>;

fn options() -> ScanOptions {
    ScanOptions::default()
        .with_frame_skip(1)
        .with_read_timeout(Duration::from_millis(20))
        .with_read_backoff(Duration::from_millis(5))
}

fn scan_loop(openers: Vec<Arc<dyn CameraOpener>>) -> ScanLoop {
    ScanLoop::new(
        openers,
        QrDecoder::new(Duration::from_millis(2500)),
        PayloadParser::default(),
        options(),
    )
}

fn recorder() -> (Emitted, impl Fn(&str, &str, &str) + Send + Sync + 'static) {
    let emitted: Emitted = Arc::new(Mutex::new(Vec::new()));
    let sink = emitted.clone();
    let callback = move |raw: &str, event_id: &str, proxy_key: &str| {
        sink.lock()
            .unwrap()
            .push((raw.to_string(), event_id.to_string(), proxy_key.to_string()));
    };
    (emitted, callback)
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_emits_parsed_keys_once_per_window() {
    let camera = MockCamera::new();
    let t0 = Instant::now();
    for i in 0..5 {
        camera.push_frame(qr_frame(CHECK_IN_URL, t0 + Duration::from_millis(100 * i)));
    }
    let scan = scan_loop(vec![Arc::new(MockCameraOpener::new("auto", camera.clone()))]);
    let (emitted, callback) = recorder();

    scan.start_async(callback).unwrap();
    assert!(wait_until(|| camera.pending() == 0 && scan.stats().frames_read == 5));
    scan.stop();
    scan.join();

    let emitted = emitted.lock().unwrap();
    assert_eq!(
        *emitted,
        vec![(
            CHECK_IN_URL.to_string(),
            EVENT_ID.to_string(),
            PROXY_KEY.to_string()
        )]
    );
}

#[test]
fn test_same_code_after_window_emits_again() {
    let camera = MockCamera::new();
    let t0 = Instant::now();
    camera.push_frame(qr_frame(CHECK_IN_URL, t0));
    camera.push_frame(qr_frame(CHECK_IN_URL, t0 + Duration::from_millis(3000)));
    let scan = scan_loop(vec![Arc::new(MockCameraOpener::new("auto", camera.clone()))]);
    let (emitted, callback) = recorder();

    scan.start_async(callback).unwrap();
    assert!(wait_until(|| scan.stats().frames_read == 2));
    scan.stop();
    scan.join();

    assert_eq!(emitted.lock().unwrap().len(), 2);
}

#[test]
fn test_foreign_codes_are_ignored() {
    let camera = MockCamera::new();
    camera.push_frame(qr_frame("https://example.com/ticket/42", Instant::now()));
    camera.push_frame(blank_frame());
    let scan = scan_loop(vec![Arc::new(MockCameraOpener::new("auto", camera.clone()))]);
    let (emitted, callback) = recorder();

    scan.start_async(callback).unwrap();
    assert!(wait_until(|| scan.stats().frames_read == 2));
    scan.stop();
    scan.join();

    assert!(emitted.lock().unwrap().is_empty());
    assert_eq!(scan.stats().payloads_emitted, 0);
}

#[test]
fn test_falls_back_to_next_backend() {
    let broken = MockCameraOpener::failing("v4l2");
    let camera = MockCamera::new();
    let working = MockCameraOpener::new("auto", camera.clone());
    let scan = scan_loop(vec![Arc::new(broken.clone()), Arc::new(working.clone())]);

    scan.start_async(|_, _, _| {}).unwrap();
    assert_eq!(scan.state(), ScanState::Running);
    assert_eq!((broken.open_count(), working.open_count()), (1, 1));

    scan.stop();
    scan.join();
    assert!(camera.is_released());
}

#[test]
fn test_open_failure_leaves_loop_stopped() {
    let scan = scan_loop(vec![Arc::new(MockCameraOpener::failing("auto"))]);
    let result = scan.start(|_, _, _| {});
    assert!(matches!(result, Err(DeviceError::NoBackendAvailable { .. })));
    assert_eq!(scan.state(), ScanState::Stopped);
}

#[test]
fn test_second_start_is_noop() {
    let camera = MockCamera::new();
    let opener = MockCameraOpener::new("auto", camera.clone());
    let scan = scan_loop(vec![Arc::new(opener.clone())]);

    scan.start_async(|_, _, _| {}).unwrap();
    scan.start_async(|_, _, _| {}).unwrap();
    scan.start(|_, _, _| {}).unwrap();

    assert_eq!(opener.open_count(), 1);
    scan.stop();
    scan.join();
}

#[test]
fn test_stop_is_idempotent_and_releases_once_per_session() {
    let camera = MockCamera::new();
    let scan = scan_loop(vec![Arc::new(MockCameraOpener::new("auto", camera.clone()))]);

    scan.start_async(|_, _, _| {}).unwrap();
    scan.stop();
    scan.stop();
    scan.join();
    scan.stop();

    assert!(camera.is_released());
    assert_eq!(camera.release_count(), 1);
    assert_eq!(scan.state(), ScanState::Stopped);
}

#[test]
fn test_restart_after_stop() {
    let camera = MockCamera::new();
    let opener = MockCameraOpener::new("auto", camera.clone());
    let scan = scan_loop(vec![Arc::new(opener.clone())]);

    scan.start_async(|_, _, _| {}).unwrap();
    scan.stop();
    scan.start_async(|_, _, _| {}).unwrap();
    assert_eq!(scan.state(), ScanState::Running);
    assert_eq!(opener.open_count(), 2);

    scan.stop();
    scan.join();
}

#[test]
fn test_blocking_start_returns_after_stop_from_other_thread() {
    let camera = MockCamera::new();
    let scan = Arc::new(scan_loop(vec![Arc::new(MockCameraOpener::new(
        "auto",
        camera.clone(),
    ))]));
    let handle = scan.stop_handle();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        handle.stop();
    });

    let started = Instant::now();
    scan.start(|_, _, _| {}).unwrap();
    stopper.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(scan.state(), ScanState::Stopped);
    assert!(camera.is_released());
}

#[test]
fn test_stop_from_callback() {
    let camera = MockCamera::new();
    camera.push_frame(qr_frame(CHECK_IN_URL, Instant::now()));
    let scan = Arc::new(scan_loop(vec![Arc::new(MockCameraOpener::new(
        "auto",
        camera.clone(),
    ))]));
    let handle = scan.stop_handle();

    scan.start(move |_, _, _| handle.stop()).unwrap();

    assert_eq!(scan.state(), ScanState::Stopped);
    assert_eq!(scan.stats().payloads_emitted, 1);
    assert!(camera.is_released());
}

#[test]
fn test_transient_read_errors_are_survived() {
    let camera = MockCamera::new();
    camera.push_error(CameraError::ReadFailed("usb hiccup".to_string()));
    camera.push_error(CameraError::Timeout);
    camera.push_frame(qr_frame(CHECK_IN_URL, Instant::now()));
    let scan = scan_loop(vec![Arc::new(MockCameraOpener::new("auto", camera.clone()))]);
    let (emitted, callback) = recorder();

    scan.start_async(callback).unwrap();
    assert!(wait_until(|| emitted.lock().unwrap().len() == 1));
    scan.stop();
    scan.join();
}
