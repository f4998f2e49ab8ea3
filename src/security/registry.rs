//! Per-client bucket registry with idle eviction.
//!
//! One entry per distinct client identity. Lookup-or-create and the last-seen
//! touch happen under the map's shard lock for that identity, so concurrent
//! first-touches never produce two buckets. Bucket arithmetic happens after the
//! map lock is released, under the bucket's own mutex.
//!
//! The map grows by one entry per distinct identity until the next sweep. A
//! flood of spoofed identities therefore grows it linearly for up to one idle
//! period; this is accepted and not mitigated here.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::observability::metrics;
use crate::security::token_bucket::TokenBucket;

/// Shared handle to a single client's bucket.
#[derive(Debug, Clone)]
pub struct BucketHandle(Arc<Mutex<TokenBucket>>);

impl BucketHandle {
    /// Admit one request if the client has a token left.
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    pub fn allow_at(&self, now: Instant) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .allow_at(now)
    }

    /// True if both handles point at the same bucket.
    pub fn same_bucket(&self, other: &BucketHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug)]
struct ClientEntry {
    bucket: BucketHandle,
    last_seen: Instant,
}

/// Registry of per-client token buckets.
#[derive(Debug)]
pub struct ClientRegistry {
    clients: DashMap<String, ClientEntry>,
    burst: f64,
    rate: f64,
    idle_timeout: Duration,
}

impl ClientRegistry {
    pub fn new(rate: f64, burst: u32, idle_timeout: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            burst: burst as f64,
            rate,
            idle_timeout,
        }
    }

    /// Look up the bucket for `identity`, creating it on first sight, and mark it seen now.
    pub fn resolve(&self, identity: &str) -> BucketHandle {
        self.resolve_at(identity, Instant::now())
    }

    pub fn resolve_at(&self, identity: &str, now: Instant) -> BucketHandle {
        let mut entry = self
            .clients
            .entry(identity.to_string())
            .or_insert_with(|| ClientEntry {
                bucket: BucketHandle(Arc::new(Mutex::new(TokenBucket::new_at(
                    self.burst, self.rate, now,
                )))),
                last_seen: now,
            });

        if now > entry.last_seen {
            entry.last_seen = now;
        }
        entry.bucket.clone()
    }

    /// Remove every entry idle for longer than the idle timeout. Returns how many were evicted.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.clients.len();
        let idle_timeout = self.idle_timeout;

        self.clients
            .retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= idle_timeout);

        let remaining = self.clients.len();
        let evicted = before.saturating_sub(remaining);

        metrics::record_rate_limit_clients(remaining);
        if evicted > 0 {
            metrics::record_rate_limit_evictions(evicted);
            tracing::debug!(evicted, remaining, "Evicted idle rate limit clients");
        }
        evicted
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.clients.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Spawn the periodic sweep. Runs until `stop` resolves.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        stop: impl Future<Output = ()> + Send + 'static,
    ) -> JoinHandle<()> {
        let registry = Arc::clone(self);

        tokio::spawn(async move {
            tracing::info!(
                interval_secs = interval.as_secs(),
                idle_timeout_secs = registry.idle_timeout.as_secs(),
                "Rate limit sweeper starting"
            );

            tokio::pin!(stop);
            let mut ticker = time::interval(interval);
            // First tick completes immediately; nothing to evict yet.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        registry.sweep();
                    }
                    _ = &mut stop => {
                        tracing::info!("Rate limit sweeper received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        })
    }
}
