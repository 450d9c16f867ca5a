//! Per-caller daily quota with a reset at midnight UTC.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::RateLimitConfig;

/// Counter backend. Increments are not coordinated across callers, so
/// concurrent bursts from one identity may slightly exceed the limit.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key` and return the new count. A key created by this call
    /// expires at `expires_at`; an expired key restarts from zero.
    async fn incr(&self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64;
}

/// Process-local counter store.
#[derive(Default)]
pub struct MemoryCounterStore {
    counters: RwLock<HashMap<String, (u64, DateTime<Utc>)>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired counters so yesterday's keys do not accumulate.
    async fn purge_expired(&self, now: DateTime<Utc>) {
        let mut counters = self.counters.write().await;
        let before = counters.len();
        counters.retain(|_, (_, expires_at)| *expires_at > now);
        let removed = before - counters.len();
        if removed > 0 {
            debug!(removed, "purged expired rate limit counters");
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        let needs_purge = {
            let counters = self.counters.read().await;
            counters.values().any(|(_, exp)| *exp <= now)
        };
        if needs_purge {
            self.purge_expired(now).await;
        }

        let mut counters = self.counters.write().await;
        let entry = counters.entry(key.to_string()).or_insert((0, expires_at));
        if entry.1 <= now {
            *entry = (0, expires_at);
        }
        entry.0 += 1;
        entry.0
    }
}

/// Outcome of a quota check, carried into response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    /// Unix seconds of the next reset (midnight UTC)
    pub reset_at: i64,
}

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    daily_limit: u64,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, daily_limit: u64) -> Self {
        Self { store, daily_limit }
    }

    /// An in-memory limiter, or `None` when rate limiting is disabled.
    pub fn from_config(config: &RateLimitConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(Arc::new(MemoryCounterStore::new()), config.daily_limit))
    }

    /// Count one request for `identity` and decide whether it may proceed.
    pub async fn check(&self, identity: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let reset = next_utc_midnight(now);
        let key = format!("ratelimit:{}:{}", identity, now.format("%Y-%m-%d"));
        let count = self.store.incr(&key, reset, now).await;

        let allowed = count <= self.daily_limit;
        if !allowed {
            warn!(identity, count, limit = self.daily_limit, "rate limit exceeded");
        }

        RateLimitDecision {
            allowed,
            limit: self.daily_limit,
            remaining: self.daily_limit.saturating_sub(count),
            reset_at: reset.timestamp(),
        }
    }
}

/// Start of the next UTC day after `now`.
pub fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .unwrap_or(chrono::NaiveDate::MAX);
    tomorrow.and_time(chrono::NaiveTime::MIN).and_utc()
}
