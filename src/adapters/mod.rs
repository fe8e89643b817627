//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileCredentialsProvider`] - File-based credentials storage
//! - `NokhwaOpener` - Native camera capture (`native-camera` feature)
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for all traits.

pub mod file_credentials;
pub mod mock;
#[cfg(feature = "native-camera")]
pub mod nokhwa_camera;
pub mod reqwest_http;

use std::sync::Arc;

pub use file_credentials::FileCredentialsProvider;
pub use mock::{InMemoryCredentials, MockCamera, MockCameraOpener, MockHttpClient, MockSessionApi};
#[cfg(feature = "native-camera")]
pub use nokhwa_camera::{NokhwaCamera, NokhwaOpener};
pub use reqwest_http::ReqwestHttpClient;

use crate::traits::CameraOpener;

/// Build the camera backend strategies for the configured preference list.
///
/// Unknown names are skipped with a warning. Without the `native-camera`
/// feature no backends are available and the list is empty.
pub fn camera_openers(backends: &[String]) -> Vec<Arc<dyn CameraOpener>> {
    backends.iter().filter_map(|name| opener_for(name)).collect()
}

/// Explain why no camera backend could be built, or `None` when some were.
pub fn missing_camera_hint(openers: &[Arc<dyn CameraOpener>], backends: &[String]) -> Option<String> {
    if !openers.is_empty() {
        return None;
    }
    if !cfg!(feature = "native-camera") {
        return Some(
            "This build has no camera support. Rebuild with `cargo build --release --features native-camera`, \
             or use `--check-in <url>` to check a guest in without a camera."
                .to_string(),
        );
    }
    if backends.is_empty() {
        return Some("No camera backends configured; set camera.backends (e.g. [\"auto\"]).".to_string());
    }
    Some(format!(
        "None of the configured camera backends {:?} are known; use auto, v4l2, avfoundation or msmf.",
        backends
    ))
}

#[cfg(feature = "native-camera")]
fn opener_for(name: &str) -> Option<Arc<dyn CameraOpener>> {
    match NokhwaOpener::from_name(name) {
        Some(opener) => Some(Arc::new(opener)),
        None => {
            tracing::warn!("Unknown camera backend {:?}, skipping", name);
            None
        }
    }
}

#[cfg(not(feature = "native-camera"))]
fn opener_for(name: &str) -> Option<Arc<dyn CameraOpener>> {
    tracing::warn!(
        "Camera backend {:?} unavailable: built without the native-camera feature",
        name
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "native-camera"))]
    #[test]
    fn test_no_native_backends_without_feature() {
        assert!(camera_openers(&["auto".to_string()]).is_empty());
    }

    #[cfg(not(feature = "native-camera"))]
    #[test]
    fn test_hint_names_feature_without_native_camera() {
        let backends = vec!["auto".to_string()];
        let openers = camera_openers(&backends);
        let hint = missing_camera_hint(&openers, &backends).unwrap();
        assert!(hint.contains("--features native-camera"));
        assert!(hint.contains("--check-in"));
    }

    #[test]
    fn test_no_hint_when_openers_exist() {
        let camera = MockCamera::new();
        let openers: Vec<Arc<dyn CameraOpener>> =
            vec![Arc::new(MockCameraOpener::new("mock", camera))];
        assert!(missing_camera_hint(&openers, &["auto".to_string()]).is_none());
    }

    #[cfg(feature = "native-camera")]
    #[test]
    fn test_hint_lists_unknown_backends() {
        let backends = vec!["bogus".to_string()];
        let hint = missing_camera_hint(&camera_openers(&backends), &backends).unwrap();
        assert!(hint.contains("bogus"));
    }

    #[cfg(feature = "native-camera")]
    #[test]
    fn test_unknown_backends_skipped() {
        let openers = camera_openers(&["auto".to_string(), "bogus".to_string()]);
        assert_eq!(openers.len(), 1);
        assert_eq!(openers[0].name(), "auto");
    }
}
