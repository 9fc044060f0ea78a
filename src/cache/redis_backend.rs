//! Redis Backend Module
//!
//! Wraps a `redis` connection manager. The connection owns reconnection: when
//! the initial connect fails or a command hits a transport error it publishes
//! `Disconnected` and re-establishes itself in the background, publishing
//! `Connected` once a PING round-trips again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use tokio::sync::{watch, RwLock};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::cache::backend::{BackendError, BackendState, KeyValueBackend};

/// Redis connection settings.
#[derive(Debug, Clone)]
pub struct RedisSettings {
    /// Connection URL (`redis://` or `rediss://`)
    pub url: String,
    /// Upper bound for each connect attempt
    pub connect_timeout: Duration,
    /// Pause between reconnect attempts
    pub reconnect_interval: Duration,
}

struct Inner {
    client: Client,
    settings: RedisSettings,
    conn: RwLock<Option<ConnectionManager>>,
    state: watch::Sender<BackendState>,
    reconnecting: AtomicBool,
    closed: AtomicBool,
}

/// Redis-backed implementation of [`KeyValueBackend`].
#[derive(Clone)]
pub struct RedisBackend {
    inner: Arc<Inner>,
}

impl RedisBackend {
    /// Opens the client and attempts the first connection.
    ///
    /// Only a malformed URL is an error; an unreachable server leaves the
    /// backend `Disconnected` with reconnection running in the background.
    pub async fn connect(settings: RedisSettings) -> Result<Self, BackendError> {
        let client = Client::open(settings.url.as_str())
            .map_err(|e| BackendError::Protocol(format!("invalid redis url: {}", e)))?;
        let (state, _) = watch::channel(BackendState::Connecting);

        let backend = Self {
            inner: Arc::new(Inner {
                client,
                settings,
                conn: RwLock::new(None),
                state,
                reconnecting: AtomicBool::new(false),
                closed: AtomicBool::new(false),
            }),
        };

        match backend.inner.establish().await {
            Ok(()) => info!("Redis connected to {}", redact(&backend.inner.settings.url)),
            Err(e) => {
                warn!("Redis connection failed, running without cache: {}", e);
                backend.inner.mark_disconnected();
            }
        }

        Ok(backend)
    }

    async fn connection(&self) -> Result<ConnectionManager, BackendError> {
        self.inner
            .conn
            .read()
            .await
            .clone()
            .ok_or_else(|| BackendError::Connectivity("not connected".to_string()))
    }

    fn observe(&self, err: RedisError) -> BackendError {
        let err = classify(err);
        if matches!(err, BackendError::Connectivity(_)) {
            self.inner.mark_disconnected();
        }
        err
    }
}

impl Inner {
    async fn establish(&self) -> Result<(), BackendError> {
        let manager = timeout(
            self.settings.connect_timeout,
            ConnectionManager::new(self.client.clone()),
        )
        .await
        .map_err(|_| BackendError::Connectivity("connect timed out".to_string()))?
        .map_err(classify)?;

        *self.conn.write().await = Some(manager);
        self.state.send_replace(BackendState::Connected);
        Ok(())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let current = self.conn.read().await.clone();
        let Some(mut conn) = current else {
            return self.establish().await;
        };
        timeout(
            self.settings.connect_timeout,
            redis::cmd("PING").query_async::<_, String>(&mut conn),
        )
        .await
        .map_err(|_| BackendError::Connectivity("ping timed out".to_string()))?
        .map_err(classify)?;

        self.state.send_replace(BackendState::Connected);
        Ok(())
    }

    fn mark_disconnected(self: &Arc<Self>) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let previous = self.state.send_replace(BackendState::Disconnected);
        if previous == BackendState::Connected {
            warn!("Redis connection lost");
        }
        self.spawn_reconnect();
    }

    fn spawn_reconnect(self: &Arc<Self>) {
        if self.reconnecting.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(inner.settings.reconnect_interval).await;
                if inner.closed.load(Ordering::SeqCst) {
                    inner.reconnecting.store(false, Ordering::SeqCst);
                    break;
                }
                match inner.ping().await {
                    Ok(()) => {
                        if inner.finish_reconnect() {
                            warn!("Redis connection dropped again, retrying");
                            continue;
                        }
                        info!("Redis connection restored");
                        break;
                    }
                    Err(e) => warn!("Redis reconnect attempt failed: {}", e),
                }
            }
        });
    }

    /// Releases the reconnect slot after a successful attempt.
    ///
    /// A disconnect published while the slot was still held did not spawn a
    /// task of its own, so when the state reads `Disconnected` after the
    /// release the slot is taken back and `true` tells the caller to retry.
    fn finish_reconnect(&self) -> bool {
        self.reconnecting.store(false, Ordering::SeqCst);
        !self.closed.load(Ordering::SeqCst)
            && *self.state.borrow() == BackendState::Disconnected
            && !self.reconnecting.swap(true, Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn subscribe(&self) -> watch::Receiver<BackendState> {
        self.inner.state.subscribe()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| self.observe(e))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BackendError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| self.observe(e))
    }

    async fn del(&self, key: &str) -> Result<bool, BackendError> {
        let mut conn = self.connection().await?;
        let removed: i64 = conn.del(key).await.map_err(|e| self.observe(e))?;
        Ok(removed > 0)
    }

    async fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.conn.write().await.take();
        self.inner.state.send_replace(BackendState::Disconnected);
        info!("Redis connection closed");
    }
}

/// Splits redis errors into transport failures and everything else.
fn classify(err: RedisError) -> BackendError {
    if err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
    {
        BackendError::Connectivity(err.to_string())
    } else {
        BackendError::Protocol(err.to_string())
    }
}

/// Strips credentials from a connection URL before logging it.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
