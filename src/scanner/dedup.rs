use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Suppresses repeated sightings of the same payload.
///
/// A payload is admitted when it has not been seen within `window`. Every
/// sighting, admitted or not, refreshes its timestamp, so a code held in
/// front of the camera fires once and fires again only after it has been
/// out of view for a full window.
#[derive(Debug)]
pub struct Deduplicator {
    window: Duration,
    last_seen: HashMap<String, Instant>,
}

impl Deduplicator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a sighting at `now`; returns `true` if it should be emitted.
    pub fn admit(&mut self, text: &str, now: Instant) -> bool {
        let window = self.window;
        self.last_seen
            .retain(|_, seen| now.saturating_duration_since(*seen) < window);

        let fresh = !self.last_seen.contains_key(text);
        self.last_seen.insert(text.to_string(), now);
        fresh
    }

    /// Forget every sighting.
    pub fn reset(&mut self) {
        self.last_seen.clear();
    }
}
