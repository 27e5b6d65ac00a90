//! Fixed-window rate limiting for unauthenticated generation requests.
//!
//! Process-local: the counter map lives in server memory, so it resets
//! on cold start and a horizontally scaled deployment multiplies the
//! effective ceiling. Swap the component for one backed by a shared
//! counter if that tradeoff stops being acceptable; the handler
//! contract does not change.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// Default ceiling per caller per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 10;
/// Fixed window length.
pub const WINDOW: Duration = Duration::from_secs(60);

struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Keyed fixed-window counter. Not a sliding window and not
/// distributed.
pub struct FixedWindowLimiter {
    entries: Mutex<HashMap<String, WindowEntry>>,
    max_requests: u32,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_requests,
        }
    }

    /// Ceiling from `RATE_LIMIT_PER_MINUTE`, default 10.
    pub fn from_env() -> Self {
        let max_requests = std::env::var("RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_REQUESTS);
        Self::new(max_requests)
    }

    /// Record one request from `caller` and report whether it is
    /// allowed.
    pub fn check(&self, caller: &str) -> bool {
        self.check_at(caller, Instant::now())
    }

    /// Window algorithm at an explicit instant (injectable for tests):
    /// an absent or expired entry is replaced with count=1; a live
    /// entry increments up to the ceiling, then denies. Expired
    /// entries are never incremented.
    pub fn check_at(&self, caller: &str, now: Instant) -> bool {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(caller) {
            Some(entry) if entry.reset_at > now => {
                if entry.count >= self.max_requests {
                    warn!("Rate limit exceeded for {}", caller);
                    return false;
                }
                entry.count += 1;
                true
            }
            _ => {
                entries.insert(
                    caller.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + WINDOW,
                    },
                );
                true
            }
        }
    }
}
