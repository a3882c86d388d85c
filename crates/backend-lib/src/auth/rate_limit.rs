// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for login attempts.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default number of attempts allowed per window
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default attempt window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Entry in the rate limit map
#[derive(Debug, Clone)]
struct AttemptRecord {
    /// Attempts recorded in the current window
    count: u32,
    /// When the current window ends
    window_reset_at: Instant,
}

/// Per-identifier login attempt limiter.
///
/// Identifiers are caller-supplied (typically the client IP). The shared
/// map is a [`DashMap`]; the entry API serializes all writers of a key,
/// so concurrent `record_attempt` calls on one identifier never lose
/// updates.
#[derive(Debug, Clone, Default)]
pub struct LoginRateLimiter {
    attempts: Arc<DashMap<String, AttemptRecord>>,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `identifier` may attempt a login right now.
    ///
    /// True when the identifier has no record, its window has elapsed,
    /// or it has attempts to spare. Pure read: an elapsed window is not
    /// cleared here, `record_attempt` restarts it.
    pub fn allowed(&self, identifier: &str, max_attempts: u32) -> bool {
        match self.attempts.get(identifier) {
            Some(record) => {
                Instant::now() > record.window_reset_at || record.count < max_attempts
            }
            None => true,
        }
    }

    /// Record a failed attempt for `identifier`.
    ///
    /// Starts a fresh window of `window` when none is running; otherwise
    /// increments the count and leaves the window end untouched.
    pub fn record_attempt(&self, identifier: &str, window: Duration) {
        let now = Instant::now();
        self.attempts
            .entry(identifier.to_string())
            .and_modify(|record| {
                if now > record.window_reset_at {
                    record.count = 1;
                    record.window_reset_at = now + window;
                } else {
                    record.count += 1;
                }
            })
            .or_insert_with(|| AttemptRecord {
                count: 1,
                window_reset_at: now + window,
            });
    }

    /// Forget `identifier` entirely. Called on successful authentication.
    pub fn reset(&self, identifier: &str) {
        self.attempts.remove(identifier);
    }

    /// Attempts currently recorded against `identifier`.
    pub fn attempts(&self, identifier: &str) -> u32 {
        self.attempts.get(identifier).map_or(0, |r| r.count)
    }

    /// Drop every entry whose window has elapsed.
    ///
    /// Identifiers that stop retrying would otherwise pin their entries
    /// forever; the server runs this on a timer.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.attempts.retain(|_, record| now <= record.window_reset_at);
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.attempts.len()
    }
}
