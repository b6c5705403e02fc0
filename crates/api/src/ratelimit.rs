//! Per-identity fixed-window rate limiting.
//!
//! The limiter is owned by `AppState` and injected into the handlers that
//! need it, so the policy is swappable in tests and no global mutable
//! state exists.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Seconds until the current window resets.
    pub retry_after_secs: u64,
}

/// Fixed-window counter keyed by identity (client IP on the public
/// respond endpoints).
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

struct Window {
    started_at: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request for `identity` and decide whether it is allowed.
    ///
    /// Expired windows are reset lazily; stale identities are pruned
    /// opportunistically to bound memory.
    pub fn check(&self, identity: &str) -> Decision {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");

        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = windows.entry(identity.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        let elapsed = now.duration_since(window.started_at);
        let retry_after_secs = self.window.saturating_sub(elapsed).as_secs().max(1);

        if window.count >= self.max_requests {
            return Decision {
                allowed: false,
                remaining: 0,
                retry_after_secs,
            };
        }

        window.count += 1;
        Decision {
            allowed: true,
            remaining: self.max_requests - window.count,
            retry_after_secs,
        }
    }
}
