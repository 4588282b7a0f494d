//! Bounded-TTL cache for release-window queries
//!
//! Keyed by the exact date window, so all users processed in one scheduler
//! tick (and any browse command asking for the same window) share a single
//! upstream fetch. Entries older than the configured max age are never
//! served; staleness inside that bound is acceptable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::provider::ReleaseWindow;
use super::types::ReleaseEntry;

struct CachedWindow {
    fetched_at: Instant,
    releases: Arc<Vec<ReleaseEntry>>,
}

pub struct WindowCache {
    entries: DashMap<ReleaseWindow, CachedWindow>,
    max_age: Duration,
}

impl WindowCache {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_age,
        }
    }

    /// Fresh cached releases for a window, or `None` on miss/expiry.
    pub fn get(&self, window: &ReleaseWindow) -> Option<Arc<Vec<ReleaseEntry>>> {
        if let Some(cached) = self.entries.get(window) {
            if cached.fetched_at.elapsed() <= self.max_age {
                return Some(Arc::clone(&cached.releases));
            }
        }
        // Expired entries are dropped on next lookup rather than on a timer
        self.entries
            .remove_if(window, |_, cached| cached.fetched_at.elapsed() > self.max_age);
        None
    }

    pub fn insert(&self, window: ReleaseWindow, releases: Vec<ReleaseEntry>) -> Arc<Vec<ReleaseEntry>> {
        let releases = Arc::new(releases);
        self.entries.insert(
            window,
            CachedWindow {
                fetched_at: Instant::now(),
                releases: Arc::clone(&releases),
            },
        );
        releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MediaKind;

    fn window(start: &str, end: &str) -> ReleaseWindow {
        ReleaseWindow::new(start.parse().unwrap(), end.parse().unwrap())
    }

    fn entry(title: &str) -> ReleaseEntry {
        ReleaseEntry {
            provider_id: 1,
            title: title.into(),
            kind: MediaKind::Movie,
            release_date: None,
            rating: None,
            popularity: None,
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = WindowCache::new(Duration::from_secs(60));
        let w = window("2026-08-05", "2026-08-08");
        assert!(cache.get(&w).is_none());

        cache.insert(w, vec![entry("Dune")]);
        let hit = cache.get(&w).unwrap();
        assert_eq!(hit[0].title, "Dune");
    }

    #[test]
    fn windows_are_cached_independently() {
        let cache = WindowCache::new(Duration::from_secs(60));
        let short = window("2026-08-05", "2026-08-08");
        let long = window("2026-08-05", "2026-09-04");
        cache.insert(short, vec![entry("Dune")]);
        assert!(cache.get(&long).is_none());
        assert!(cache.get(&short).is_some());
    }

    #[test]
    fn expired_entries_are_not_served() {
        let cache = WindowCache::new(Duration::ZERO);
        let w = window("2026-08-05", "2026-08-08");
        cache.insert(w, vec![entry("Dune")]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(&w).is_none());
    }

    #[test]
    fn insert_overwrites_previous_window() {
        let cache = WindowCache::new(Duration::from_secs(60));
        let w = window("2026-08-05", "2026-08-08");
        cache.insert(w, vec![entry("Old")]);
        cache.insert(w, vec![entry("New")]);
        assert_eq!(cache.get(&w).unwrap()[0].title, "New");
    }
}
