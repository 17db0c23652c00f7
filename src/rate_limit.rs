use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::clock::Clock;
use crate::metrics::TRACKED_CLIENTS;

// Max requests admitted per client in one window
pub const MAX_REQUESTS: u32 = 10;

// Window length in seconds (5 minutes)
pub const WINDOW_SECS: i64 = 5 * 60;

// Rate limit entry - tracks requests per client key
#[derive(Debug, Clone, Copy)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

// Fixed-window request counter keyed by client identifier.
// A window restarts on the first request at or after its reset instant, so up
// to 2 * MAX_REQUESTS can pass around a boundary. State is per process.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    clock: Arc<dyn Clock>,
    max_requests: u32,
    window: TimeDelta,
}

impl RateLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(clock, MAX_REQUESTS, TimeDelta::seconds(WINDOW_SECS))
    }

    pub fn with_policy(clock: Arc<dyn Clock>, max_requests: u32, window: TimeDelta) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            max_requests,
            window,
        }
    }

    // true = reject; check and increment run under the shard lock for `key`
    pub fn is_rate_limited(&self, key: &str) -> bool {
        let now = self.clock.now();
        let fresh = RateLimitEntry {
            count: 1,
            window_reset_at: now + self.window,
        };

        let mut entry = match self.entries.entry(key.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                TRACKED_CLIENTS.set(self.entries.len() as f64);
                return false;
            }
            Entry::Occupied(occupied) => occupied.into_ref(),
        };

        // window expired..? start a new one
        if now >= entry.window_reset_at {
            *entry = fresh;
            return false;
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            return false;
        }

        true
    }

    // Drops entries whose window is already over, returns how many went
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.window_reset_at);
        let remaining = self.entries.len();
        TRACKED_CLIENTS.set(remaining as f64);
        before.saturating_sub(remaining)
    }

    pub fn tracked_clients(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| *entry)
    }
}

// Background sweep of expired windows
pub async fn run_pruner(limiter: Arc<RateLimiter>, period: Duration) {
    let mut ticker = interval(period);

    tracing::info!(period = ?period, "rate limit pruner started");

    loop {
        ticker.tick().await;

        let removed = limiter.prune_expired();
        let remaining = limiter.tracked_clients();

        if removed > 0 {
            tracing::debug!(removed, remaining, "pruned expired rate limit windows");
        }
    }
}
