//! Key-value backend seam
//!
//! The remote cache (Redis in production, an in-process map in tests and
//! single-node setups) sits behind [`KeyValueBackend`]. Backends are fallible;
//! containing their failures is the job of [`super::CacheStore`].

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// Connection state published by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    /// Initial connection attempt still in flight
    Connecting,
    /// Commands can be issued
    Connected,
    /// Connection lost or never established
    Disconnected,
}

/// Failure of a single backend command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport level failure: refused, dropped, timed out
    #[error("cache backend unreachable: {0}")]
    Connectivity(String),

    /// The backend answered, but not with something usable
    #[error("cache backend protocol error: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Short failure class used in log fields.
    pub fn class(&self) -> &'static str {
        match self {
            BackendError::Connectivity(_) => "connectivity",
            BackendError::Protocol(_) => "protocol",
        }
    }
}

/// Remote key-value store with per-key expiry.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Backend name for logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Subscribes to connection state notifications.
    fn subscribe(&self) -> watch::Receiver<BackendState>;

    /// Reads a value. `Ok(None)` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Writes a value that expires after `ttl_secs`.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BackendError>;

    /// Removes a key. Returns whether it existed.
    async fn del(&self, key: &str) -> Result<bool, BackendError>;

    /// Releases the connection. Later commands fail with a connectivity error.
    async fn close(&self);
}
