use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Outcome of recording one attempt against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// Attempt recorded; `remaining` more fit in the current window.
    Allowed { remaining: usize },
    /// Window already full; the oldest entry expires after `retry_after`.
    Limited { retry_after: Duration },
}

/// Sliding log of attempt instants for one key.
#[derive(Debug)]
struct AttemptLog {
    attempts: VecDeque<Instant>,
}

impl AttemptLog {
    fn new() -> Self {
        Self {
            attempts: VecDeque::new(),
        }
    }

    /// Drops every attempt at or beyond `window` age. Oldest entries sit at the front.
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(oldest) = self.attempts.front() {
            if now.duration_since(*oldest) >= window {
                self.attempts.pop_front();
            } else {
                break;
            }
        }
    }

    fn record(&mut self, now: Instant, window: Duration, limit: usize) -> WindowDecision {
        self.prune(now, window);

        if self.attempts.len() >= limit {
            let retry_after = self.attempts
                .front()
                .map(|oldest| window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(window);
            return WindowDecision::Limited { retry_after };
        }

        self.attempts.push_back(now);
        WindowDecision::Allowed {
            remaining: limit - self.attempts.len(),
        }
    }

    fn is_idle(&self, now: Instant, window: Duration) -> bool {
        self.attempts
            .back()
            .is_none_or(|newest| now.duration_since(*newest) >= window)
    }
}

type Key = String;

/// Per-key sliding-window counters shared by every request handler.
///
/// Each key owns its own mutex so prune and append happen atomically per
/// client. A log is only ever locked while its map guard is held, which keeps
/// `evict_idle` from dropping an entry between lookup and record.
#[derive(Clone)]
pub struct IpWindowLimiter {
    map: Arc<DashMap<Key, Mutex<AttemptLog>>>,
    limit: usize,
    window: Duration,
}

impl IpWindowLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            limit,
            window,
        }
    }

    /// Prunes stale attempts for `key`, then records this one if the window has room.
    pub fn check_and_record(&self, key: &str) -> WindowDecision {
        if let Some(entry) = self.map.get(key) {
            let mut log = entry.lock();
            return log.record(Instant::now(), self.window, self.limit);
        }

        let entry = self.map
            .entry(key.to_string())
            .or_insert_with(|| Mutex::new(AttemptLog::new()));
        let mut log = entry.lock();
        log.record(Instant::now(), self.window, self.limit)
    }

    /// Attempts currently counted against `key`.
    pub fn attempts(&self, key: &str) -> usize {
        match self.map.get(key) {
            Some(log) => {
                let mut log = log.lock();
                log.prune(Instant::now(), self.window);
                log.attempts.len()
            }
            None => 0,
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }

    /// Removes keys with no attempt inside the window. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.map.len();
        self.map.retain(|_, log| !log.lock().is_idle(now, self.window));
        before.saturating_sub(self.map.len())
    }
}
