use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::{mapref::entry::Entry, DashMap};

use crate::settings::AppConfig;

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Accepted; `count` is the number of accepted requests in the window so far.
    Allowed { count: u32 },
    /// Rejected until `reset_time`.
    Denied { reset_time: DateTime<Utc> },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window }
    }

    fn window_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.window).unwrap_or(TimeDelta::hours(1))
    }
}

impl From<&AppConfig> for RateLimitPolicy {
    fn from(config: &AppConfig) -> Self {
        RateLimitPolicy::new(config.rate_limit_max, config.rate_limit_window())
    }
}

/// Counting store keyed by client identifier. Implementations decide where the
/// counters live; the contact handler only sees the decision.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn check(&self, client_id: &str, now: DateTime<Utc>) -> RateDecision;

    /// Short label for the health report.
    fn backend(&self) -> &'static str;

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Accepted requests for one client in the current fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_time: DateTime<Utc>,
}

impl RateLimitEntry {
    fn start(now: DateTime<Utc>, window: TimeDelta) -> Self {
        Self { count: 1, reset_time: now + window }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_time
    }
}

/// Per-process limiter. State starts empty and is lost on restart, so the
/// bound only holds for traffic that keeps hitting the same instance.
#[derive(Debug, Clone)]
pub struct InMemoryRateLimiter {
    entries: Arc<DashMap<String, RateLimitEntry>>,
    policy: RateLimitPolicy,
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// The entry lock is held for the whole read-modify-write, so concurrent
    /// workers cannot both take the last slot.
    pub fn check_at(&self, client_id: &str, now: DateTime<Utc>) -> RateDecision {
        let window = self.policy.window_delta();

        match self.entries.entry(client_id.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(RateLimitEntry::start(now, window));
                RateDecision::Allowed { count: 1 }
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(now) {
                    *entry = RateLimitEntry::start(now, window);
                    RateDecision::Allowed { count: 1 }
                } else if entry.count < self.policy.max_requests {
                    entry.count += 1;
                    RateDecision::Allowed { count: entry.count }
                } else {
                    RateDecision::Denied { reset_time: entry.reset_time }
                }
            }
        }
    }

    pub fn entry(&self, client_id: &str) -> Option<RateLimitEntry> {
        self.entries.get(client_id).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries whose window is over. Returns how many were removed.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimiter {
    async fn check(&self, client_id: &str, now: DateTime<Utc>) -> RateDecision {
        self.check_at(client_id, now)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
