//! Common test utilities for integration tests.
//!
//! Fixtures for the Luma API (settings, guest JSON), temp credential
//! stores, and QR rendering for camera-free scan tests.

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use image::{GrayImage, Luma};
use luma_door::adapters::FileCredentialsProvider;
use luma_door::scanner::Frame;
use luma_door::startup::{AccountCredentials, ApiSettings};
use std::time::Instant;
use tempfile::TempDir;

pub const EVENT_ID: &str = "evt-ABC123";
pub const PROXY_KEY: &str = "g-XYZ789";
pub const CHECK_IN_URL: &str = "https://lu.ma/check-in/evt-ABC123?pk=g-XYZ789";
pub const SESSION_COOKIE: &str = "luma.auth-session-key";

/// Account used for sign-in in tests.
pub fn test_account() -> AccountCredentials {
    AccountCredentials::new("door@example.com", "correct-horse")
}

/// API settings pointing at a mock server, with the extra headers the
/// production config sends.
pub fn api_settings(base_url: &str) -> ApiSettings {
    ApiSettings::default()
        .with_base_url(base_url)
        .with_header("User-Agent", "luma-door-tests")
        .with_header("Origin", "https://lu.ma")
}

/// File-backed credential store inside `dir`.
pub fn temp_credentials(dir: &TempDir) -> FileCredentialsProvider {
    FileCredentialsProvider::with_path(dir.path().join(".luma-door").join("credentials.json"))
}

/// Body of a successful get-guest response.
pub fn guest_json(name: &str, email: &str, last_checked_in_at: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "guest": {
            "api_id": "gst-1",
            "name": name,
            "email": email,
            "last_checked_in_at": last_checked_in_at,
        }
    })
}

/// Render `text` as a QR code image with a quiet zone.
pub fn render_qr(text: &str) -> GrayImage {
    let code = qrcode::QrCode::new(text.as_bytes()).expect("encodable payload");
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let (scale, quiet) = (5u32, 4u32);
    let size = (modules + 2 * quiet) * scale;
    GrayImage::from_fn(size, size, |x, y| {
        let (mx, my) = (x / scale, y / scale);
        let inside = mx >= quiet && my >= quiet && mx < modules + quiet && my < modules + quiet;
        if !inside {
            return Luma([255]);
        }
        match colors[((my - quiet) * modules + (mx - quiet)) as usize] {
            qrcode::Color::Dark => Luma([0]),
            qrcode::Color::Light => Luma([255]),
        }
    })
}

/// A camera frame showing `text` as a QR code, captured at `at`.
pub fn qr_frame(text: &str, at: Instant) -> Frame {
    Frame::captured_at(Frame::from_gray(&render_qr(text)).image().clone(), at)
}

/// A frame with nothing in it.
pub fn blank_frame() -> Frame {
    Frame::from_gray(&GrayImage::from_pixel(160, 120, Luma([200])))
}
