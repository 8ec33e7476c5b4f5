//! Fixed-window request limiter.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Counts requests per client per fixed window of `window_secs` seconds.
///
/// A request is allowed while the client's count in the current window is at
/// most `max_requests`. Counters from earlier windows are pruned on access.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window_secs: u64,
    counts: Mutex<HashMap<(String, u64), u32>>,
}

impl RateLimiter {
    /// `window_secs` is clamped to at least one second.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.max(1),
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request for `client` and report whether it is allowed.
    pub fn check(&self, client: &str) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.check_at(client, now)
    }

    /// As [`RateLimiter::check`], at an explicit unix time in seconds.
    pub fn check_at(&self, client: &str, now_secs: u64) -> bool {
        let window = now_secs / self.window_secs;
        let mut counts = self.counts.lock();
        counts.retain(|(_, w), _| *w >= window);

        let count = counts.entry((client.to_string(), window)).or_insert(0);
        *count = count.saturating_add(1);
        *count <= self.max_requests
    }

    /// Drop all counters.
    pub fn reset(&self) {
        self.counts.lock().clear();
    }

    /// Number of live counters.
    pub fn tracked(&self) -> usize {
        self.counts.lock().len()
    }
}
