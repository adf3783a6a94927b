use chrono::Utc;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::limiter::rate_limiter::InMemoryRateLimiter;

/// Periodically drops in-memory rate-limit entries whose window has closed.
/// An expired entry behaves exactly like a missing one, so this only bounds
/// memory.
pub async fn start_rate_limit_sweep(limiter: InMemoryRateLimiter, every: Duration) {
    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let removed = limiter.sweep_expired(Utc::now());
        if removed > 0 {
            tracing::debug!(removed, remaining = limiter.len(), "Swept expired rate-limit entries");
        }
    }
}
