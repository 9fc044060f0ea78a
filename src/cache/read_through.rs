//! Read-Through Cache Module
//!
//! Serves a response from the cache when present, otherwise runs the producer
//! and stores its result. Values are stored as JSON text, so a hit is returned
//! without touching the catalog.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{
    build_key, CacheStats, CacheStore, KeyPart, Operation, SetOutcome, StatsRecorder, TtlPolicy,
};

// == Read-Through Cache ==
/// Cache in front of the catalog.
///
/// Concurrent misses on one key each run their producer and each write; the
/// last write wins. Values for one key are interchangeable, so this only costs
/// extra upstream calls.
pub struct ReadThroughCache {
    store: Arc<CacheStore>,
    policy: TtlPolicy,
    stats: StatsRecorder,
}

impl ReadThroughCache {
    // == Constructor ==
    pub fn new(store: Arc<CacheStore>, policy: TtlPolicy) -> Self {
        Self {
            store,
            policy,
            stats: StatsRecorder::default(),
        }
    }

    /// The underlying adapter.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Get Or Compute ==
    /// Returns the cached value for (`operation`, `parts`) or produces it.
    ///
    /// Producer errors are returned unchanged and never cached. The produced
    /// value is stored for `ttl_override`, or the policy TTL of `operation`
    /// when no override is given; a failed store does not affect the result.
    /// A cached payload that no longer decodes as `T` counts as a miss.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        operation: Operation,
        parts: &[KeyPart<'_>],
        ttl_override: Option<Duration>,
        producer: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = build_key(operation, parts);

        if let Some(raw) = self.store.get(&key).await {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    self.stats.record_hit();
                    debug!("Cache hit for {}", key);
                    return Ok(value);
                }
                Err(e) => warn!("Ignoring undecodable cache entry {}: {}", key, e),
            }
        }

        self.stats.record_miss();
        debug!("Cache miss for {}", key);

        let value = producer().await?;

        let ttl = ttl_override.unwrap_or_else(|| self.policy.ttl_for(operation));
        match serde_json::to_string(&value) {
            Ok(serialized) => match self.store.set(&key, &serialized, ttl).await {
                SetOutcome::Committed => self.stats.record_write(),
                SetOutcome::Skipped => self.stats.record_skipped_write(),
            },
            Err(e) => {
                warn!("Could not serialize response for {}: {}", key, e);
                self.stats.record_skipped_write();
            }
        }

        Ok(value)
    }
}
