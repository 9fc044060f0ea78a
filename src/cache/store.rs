//! Cache Store Module
//!
//! Adapter between the read-through cache and a [`KeyValueBackend`]. Backend
//! failures never leave this type: reads degrade to a miss and writes to
//! [`SetOutcome::Skipped`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::backend::{BackendState, KeyValueBackend};

/// Result of a cache write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The backend accepted the value
    Committed,
    /// Not written: backend down, slow or erroring
    Skipped,
}

// == Cache Store ==
/// Failure-containing wrapper around the shared backend connection.
///
/// Built once at startup, shared through `Arc`, closed on shutdown.
pub struct CacheStore {
    /// The remote store
    backend: Arc<dyn KeyValueBackend>,
    /// Connection state as last published by the backend
    state: watch::Receiver<BackendState>,
    /// Upper bound for any single command
    op_timeout: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Wraps `backend`, bounding every command by `op_timeout`.
    pub fn new(backend: Arc<dyn KeyValueBackend>, op_timeout: Duration) -> Self {
        let state = backend.subscribe();
        Self {
            backend,
            state,
            op_timeout,
        }
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    // == Liveness ==
    /// Whether the backend currently reports a usable connection.
    pub fn is_live(&self) -> bool {
        *self.state.borrow() == BackendState::Connected
    }

    // == Get ==
    /// Reads `key`. Any backend problem is logged and reported as absent.
    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.is_live() {
            debug!("Cache backend not live, skipping get for {}", key);
            return None;
        }

        match timeout(self.op_timeout, self.backend.get(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!("Cache get failed ({}) for {}: {}", e.class(), key, e);
                None
            }
            Err(_) => {
                warn!("Cache get failed (connectivity) for {}: timed out", key);
                None
            }
        }
    }

    // == Set ==
    /// Writes `value` under `key` for `ttl`.
    ///
    /// Sub-second TTLs are not written since the backend counts in whole seconds.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> SetOutcome {
        if !self.is_live() {
            debug!("Cache backend not live, skipping set for {}", key);
            return SetOutcome::Skipped;
        }

        let ttl_secs = ttl.as_secs();
        if ttl_secs == 0 {
            return SetOutcome::Skipped;
        }

        match timeout(self.op_timeout, self.backend.set_ex(key, value, ttl_secs)).await {
            Ok(Ok(())) => SetOutcome::Committed,
            Ok(Err(e)) => {
                warn!("Cache set failed ({}) for {}: {}", e.class(), key, e);
                SetOutcome::Skipped
            }
            Err(_) => {
                warn!("Cache set failed (connectivity) for {}: timed out", key);
                SetOutcome::Skipped
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Returns true only when the backend confirmed a removal.
    pub async fn delete(&self, key: &str) -> bool {
        if !self.is_live() {
            return false;
        }

        match timeout(self.op_timeout, self.backend.del(key)).await {
            Ok(Ok(removed)) => removed,
            Ok(Err(e)) => {
                warn!("Cache delete failed ({}) for {}: {}", e.class(), key, e);
                false
            }
            Err(_) => {
                warn!("Cache delete failed (connectivity) for {}: timed out", key);
                false
            }
        }
    }

    // == Close ==
    /// Releases the backend connection.
    pub async fn close(&self) {
        self.backend.close().await;
    }
}
