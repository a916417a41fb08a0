use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Fixed-window request counter.
///
/// The window starts when the limiter is built. Once a request arrives after
/// `reset_at`, the count starts over and the next window is anchored at that
/// request.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    state: Mutex<Window>,
}

#[derive(Debug)]
struct Window {
    count: u32,
    reset_at: Instant,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::starting_at(max_requests, window, Instant::now())
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    pub fn starting_at(max_requests: u32, window: Duration, now: Instant) -> Self {
        Self {
            max_requests,
            window,
            state: Mutex::new(Window {
                count: 0,
                reset_at: now + window,
            }),
        }
    }

    /// Count a request; `false` when the window is already full
    pub fn check(&self) -> bool {
        self.check_at(Instant::now())
    }

    pub fn check_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now > state.reset_at {
            state.count = 0;
            state.reset_at = now + self.window;
        }

        if state.count >= self.max_requests {
            return false;
        }

        state.count += 1;
        true
    }
}
