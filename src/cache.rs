// Fingerprint-keyed response cache with time-only expiry.
// Entries are never evicted for size. Expired entries are hidden from
// get() immediately and physically removed by the Sweeper.

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::metrics::{CACHE_EVICTIONS, CACHE_SIZE};

// Cache entry with expiry deadline
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub response: String,
    pub expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// Create a cache key: hex SHA-256 of system immediately followed by prompt.
// No separator, so ("ab", "c") and ("a", "bc") share a key.
pub fn fingerprint(system: &str, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(system.as_bytes());
    hasher.update(prompt.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // cached text, unless absent or past its deadline
    pub fn get(&self, key: &str) -> Option<String> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(Instant::now()) {
            return None;
        }
        Some(entry.response.clone())
    }

    // last writer wins
    pub fn set(&self, key: String, response: String) {
        self.entries.insert(
            key,
            CacheEntry {
                response,
                expires_at: Instant::now() + self.ttl,
            },
        );
        CACHE_SIZE.set(self.entries.len() as f64);
    }

    // Remove every expired entry, returning how many were dropped.
    // The scan holds one shard's read lock at a time while it walks that shard;
    // removals then take the write lock per key, never across the whole map.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.is_expired(now))
            .map(|e| e.key().clone())
            .collect();

        let mut removed = 0;
        for key in expired {
            // re-check: a concurrent set may have refreshed it
            if self
                .entries
                .remove_if(&key, |_, e| e.is_expired(now))
                .is_some()
            {
                removed += 1;
            }
        }

        CACHE_EVICTIONS.inc_by(removed as f64);
        CACHE_SIZE.set(self.entries.len() as f64);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Periodic purge of expired entries, stopped explicitly on shutdown
pub struct Sweeper {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub fn start(cache: Arc<ResponseCache>, every: Duration) -> Self {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            ticker.tick().await;
            info!("Cache sweeper started (interval: {:?})", every);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if cache.is_empty() {
                            continue;
                        }
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                        }
                    }
                }
            }
            info!("Cache sweeper stopped");
        });

        Self { shutdown, handle }
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        let _ = self.handle.await;
    }
}
