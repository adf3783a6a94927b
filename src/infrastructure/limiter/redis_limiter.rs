use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    Client as RedisClient, RedisResult, Script,
};

use super::rate_limiter::{RateDecision, RateLimitPolicy, RateLimitStore};

// Denials leave the counter untouched; the first accepted request of a window
// sets the expiry, so the window is anchored at that request.
static CHECK_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local current = tonumber(redis.call('GET', KEYS[1]) or '0')
        if current >= tonumber(ARGV[1]) then
            return {0, current, redis.call('PTTL', KEYS[1])}
        end
        current = redis.call('INCR', KEYS[1])
        if current == 1 then
            redis.call('PEXPIRE', KEYS[1], ARGV[2])
        end
        return {1, current, redis.call('PTTL', KEYS[1])}
        "#,
    )
});

/// Limiter whose counters live in Redis, shared by every instance that points
/// at the same server. Expiry uses the Redis clock. The connection is opened
/// once and reconnects on its own after Redis restarts.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    policy: RateLimitPolicy,
}

impl RedisRateLimiter {
    pub fn new(conn: ConnectionManager, policy: RateLimitPolicy) -> Self {
        Self { conn, policy }
    }

    /// Opens the shared connection. Fails if Redis cannot be reached right now.
    pub async fn connect(client: RedisClient, policy: RateLimitPolicy) -> RedisResult<Self> {
        let config = ConnectionManagerConfig::new().set_number_of_retries(1);
        let conn = client.get_connection_manager_with_config(config).await?;
        Ok(Self::new(conn, policy))
    }

    pub fn key_for(client_id: &str) -> String {
        // Normalize and URL-encode to keep the Redis key safe
        let normalized = client_id.trim().to_lowercase();
        format!("rl:contact:{}", urlencoding::encode(&normalized))
    }

    async fn run_check(&self, client_id: &str) -> RedisResult<(i64, i64, i64)> {
        let mut conn = self.conn.clone();
        CHECK_SCRIPT
            .key(Self::key_for(client_id))
            .arg(self.policy.max_requests)
            .arg(self.policy.window.as_millis() as u64)
            .invoke_async(&mut conn)
            .await
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimiter {
    async fn check(&self, client_id: &str, now: DateTime<Utc>) -> RateDecision {
        match self.run_check(client_id).await {
            Ok((1, count, _)) => RateDecision::Allowed { count: count.max(0) as u32 },
            Ok((_, _, ttl_ms)) => {
                let remaining = if ttl_ms > 0 {
                    TimeDelta::milliseconds(ttl_ms)
                } else {
                    TimeDelta::from_std(self.policy.window).unwrap_or(TimeDelta::hours(1))
                };
                RateDecision::Denied { reset_time: now + remaining }
            }
            Err(e) => {
                // Counters are advisory; an unreachable store must not block contact.
                tracing::warn!(error = %e, client_id, "Redis rate limit check failed, allowing request");
                RateDecision::Allowed { count: 0 }
            }
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn is_healthy(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        matches!(pong.as_deref(), Ok("PONG"))
    }
}
