//! In-Memory Backend Module
//!
//! HashMap storage with lazy TTL expiration, used when no Redis is configured
//! and as the backend for tests. Expired entries are dropped when read, and
//! writes sweep out every expired entry at most once per [`SWEEP_INTERVAL_MS`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::debug;

use crate::cache::backend::{BackendError, BackendState, KeyValueBackend};
use crate::cache::entry::{CacheEntry, Clock, SystemClock};

/// Minimum clock time between two write-path sweeps.
pub const SWEEP_INTERVAL_MS: u64 = 1_000;

// == Memory Backend ==
/// Process-local key-value store with per-entry expiry.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
    /// Published connection state
    state: watch::Sender<BackendState>,
    /// Earliest instant the next write may sweep expired entries
    next_sweep_ms: AtomicU64,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend on the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty backend driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(BackendState::Connected);
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            state,
            next_sweep_ms: AtomicU64::new(0),
        }
    }

    // == Outage Simulation ==
    /// Marks the backend disconnected; commands fail until [`Self::restore`].
    pub fn simulate_outage(&self) {
        self.state.send_replace(BackendState::Disconnected);
    }

    /// Marks the backend connected again. Stored entries survive the outage.
    pub fn restore(&self) {
        self.state.send_replace(BackendState::Connected);
    }

    // == Length ==
    /// Number of stored entries, expired ones included until they are read
    /// or swept by a later write.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn ensure_connected(&self) -> Result<(), BackendError> {
        match *self.state.borrow() {
            BackendState::Connected => Ok(()),
            _ => Err(BackendError::Connectivity(
                "in-memory backend is offline".to_string(),
            )),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn subscribe(&self) -> watch::Receiver<BackendState> {
        self.state.subscribe()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.ensure_connected()?;
        let now = self.clock.now_ms();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it so the map does not grow with dead entries
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired_at(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BackendError> {
        self.ensure_connected()?;
        if ttl_secs == 0 {
            return Err(BackendError::Protocol(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value.to_string(), ttl_secs, now);

        let mut entries = self.entries.write().await;
        if now >= self.next_sweep_ms.load(Ordering::Relaxed) {
            let before = entries.len();
            entries.retain(|_, e| !e.is_expired_at(now));
            self.next_sweep_ms
                .store(now.saturating_add(SWEEP_INTERVAL_MS), Ordering::Relaxed);
            if entries.len() < before {
                debug!("Swept {} expired cache entries", before - entries.len());
            }
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, BackendError> {
        self.ensure_connected()?;
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn close(&self) {
        self.entries.write().await.clear();
        self.state.send_replace(BackendState::Disconnected);
    }
}
