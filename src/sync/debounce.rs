//! Per-path debounce windows.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Remembers when each key was last accepted.
///
/// Entries are never evicted; the key space is bounded by the files the
/// process sees during its lifetime.
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    last: Mutex<HashMap<String, Instant>>,
}

impl Debounce {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Whether `key` may be accepted now.
    #[must_use]
    pub fn is_ready(&self, key: &str) -> bool {
        self.is_ready_at(key, Instant::now())
    }

    /// Record `key` as accepted now.
    pub fn record(&self, key: &str) {
        self.last.lock().insert(key.to_string(), Instant::now());
    }

    /// Check and record in one step; `false` means the call was suppressed.
    pub fn try_accept(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut last = self.last.lock();
        if last
            .get(key)
            .is_some_and(|t| now.saturating_duration_since(*t) < self.window)
        {
            return false;
        }
        last.insert(key.to_string(), now);
        true
    }

    fn is_ready_at(&self, key: &str, now: Instant) -> bool {
        self.last
            .lock()
            .get(key)
            .map_or(true, |t| now.saturating_duration_since(*t) >= self.window)
    }
}
