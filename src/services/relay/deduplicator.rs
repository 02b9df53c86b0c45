//! Short-horizon duplicate suppression.
//!
//! Fizzy retries webhooks and occasionally fires the same event twice. A
//! delivery is dropped when the same (destination, action, eventable id) was
//! accepted less than `window` ago. The accepted timestamp is not refreshed
//! by a dropped repeat, so a steady stream of retries cannot extend the window.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Default suppression window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);

/// Default map size above which expired entries are swept.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 1024;

/// Monotonic time source shared by every request worker.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock implementation backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub destination: String,
    pub action: String,
    pub eventable_id: String,
}

/// Outcome of a dedup check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting, or the previous one has expired
    Accepted,
    /// Repeat within the window
    Duplicate,
}

/// Lock-striped map of recently accepted deliveries.
pub struct Deduplicator {
    seen: DashMap<DedupKey, Instant>,
    window: Duration,
    sweep_threshold: usize,
    clock: Arc<dyn Clock>,
}

impl Deduplicator {
    pub fn new(window: Duration, sweep_threshold: usize) -> Self {
        Self::with_clock(window, sweep_threshold, Arc::new(SystemClock))
    }

    pub fn with_clock(window: Duration, sweep_threshold: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            seen: DashMap::new(),
            window,
            sweep_threshold: sweep_threshold.max(1),
            clock,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Records a delivery and reports whether it should go out.
    ///
    /// Deliveries without an eventable id have no stable identity and are
    /// always accepted without being tracked.
    pub fn check(&self, destination: &str, action: &str, eventable_id: &str) -> Admission {
        if eventable_id.is_empty() {
            return Admission::Accepted;
        }

        let now = self.clock.now();
        if self.seen.len() > self.sweep_threshold {
            self.sweep(now);
        }

        let key = DedupKey {
            destination: destination.to_string(),
            action: action.to_string(),
            eventable_id: eventable_id.to_string(),
        };

        // The entry guard holds the shard lock for this single lookup-and-insert.
        match self.seen.entry(key) {
            Entry::Occupied(mut entry) => {
                if now.saturating_duration_since(*entry.get()) < self.window {
                    Admission::Duplicate
                } else {
                    entry.insert(now);
                    Admission::Accepted
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                Admission::Accepted
            }
        }
    }

    /// Drops every entry whose window has elapsed.
    pub fn sweep(&self, now: Instant) {
        let before = self.seen.len();
        self.seen
            .retain(|_, seen_at| now.saturating_duration_since(*seen_at) < self.window);
        let removed = before.saturating_sub(self.seen.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.seen.len(), "Swept expired dedup entries");
        }
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_SWEEP_THRESHOLD)
    }
}
