//! # Feature: Rate Limiting
//!
//! Keeps one chat from flooding the bot with commands. Sliding window over
//! recent request instants, one window per chat, DashMap for lock-free
//! concurrent access from the per-command tasks.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false

use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Clone)]
pub struct RateLimiter {
    requests: DashMap<i64, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Record a request for the chat and report whether it is allowed.
    pub fn check(&self, chat_id: i64) -> bool {
        let now = Instant::now();
        let mut entry = self.requests.entry(chat_id).or_default();

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));
        assert!(limiter.check(1));
        assert!(limiter.check(1));
        assert!(limiter.check(1));
    }

    #[test]
    fn blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));
        assert!(limiter.check(1));
        assert!(limiter.check(1));
        assert!(!limiter.check(1));
    }

    #[test]
    fn window_resets_after_elapse() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        assert!(limiter.check(1));
        assert!(!limiter.check(1));

        std::thread::sleep(Duration::from_millis(80));
        assert!(limiter.check(1));
    }

    #[test]
    fn chats_are_limited_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));
        assert!(limiter.check(1));
        assert!(limiter.check(2));
        assert!(!limiter.check(1));
        assert!(!limiter.check(2));
    }
}
