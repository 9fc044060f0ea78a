//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::accounts::DEFAULT_HASH_ROUNDS;
use crate::cache::{Operation, TtlPolicy};

/// Placeholder signing secret used when `JWT_SECRET` is unset.
pub const DEV_JWT_SECRET: &str = "dev-only-insecure-secret";

/// Which key-value backend holds cached responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    Redis,
    Memory,
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackendKind::Redis),
            "memory" => Ok(CacheBackendKind::Memory),
            other => Err(format!("unknown cache backend: {}", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    pub cache_backend: CacheBackendKind,
    pub redis_url: String,
    /// Bound on the initial backend connection attempt
    pub cache_connect_timeout: Duration,
    /// Bound on every cache get/set/delete
    pub cache_op_timeout: Duration,
    /// Delay between reconnection attempts while the backend is down
    pub cache_reconnect_interval: Duration,
    pub ttl_policy: TtlPolicy,
    pub tmdb_base_url: String,
    pub tmdb_api_key: String,
    pub tmdb_image_base_url: String,
    pub tmdb_timeout: Duration,
    pub jwt_secret: String,
    pub jwt_lifetime: Duration,
    /// PBKDF2 rounds for newly stored passwords
    pub password_hash_rounds: u32,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    parse_or(name, env::var(name).ok(), default)
}

/// Parses a set variable, keeping `default` (with a warning) when it does not
/// parse. Unset and blank values fall back silently.
fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("Ignoring invalid {}={:?}, using the default", name, raw);
            default
        }
    }
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Name of the variable overriding the TTL of `operation`.
pub fn ttl_env_var(operation: Operation) -> String {
    format!("CACHE_TTL_{}", operation.as_str().to_ascii_uppercase())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `REDIS_URL` - backend address (default: redis://localhost:6379)
    /// - `CACHE_CONNECT_TIMEOUT_MS` - initial connect bound (default: 2000)
    /// - `CACHE_OP_TIMEOUT_MS` - per-operation bound (default: 250)
    /// - `CACHE_RECONNECT_INTERVAL_SECS` - reconnect delay (default: 5)
    /// - `CACHE_TTL_<OPERATION>` - TTL seconds per operation
    /// - `TMDB_BASE_URL`, `TMDB_API_KEY`, `TMDB_IMAGE_BASE_URL`, `TMDB_TIMEOUT_SECS`
    /// - `JWT_SECRET`, `JWT_EXPIRES_IN_SECS` (default: 30 days)
    /// - `PASSWORD_HASH_ROUNDS` - PBKDF2 rounds (default: 600000)
    ///
    /// A set value that does not parse is logged and replaced by its default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mut ttl_policy = TtlPolicy::default();
        for operation in Operation::ALL {
            let secs = env::var(ttl_env_var(operation))
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0);
            if let Some(secs) = secs {
                ttl_policy = ttl_policy.with_ttl(operation, Duration::from_secs(secs));
            }
        }

        Self {
            server_port: env_or("PORT", defaults.server_port),
            cache_backend: env_or("CACHE_BACKEND", defaults.cache_backend),
            redis_url: env_string("REDIS_URL", &defaults.redis_url),
            cache_connect_timeout: Duration::from_millis(env_or(
                "CACHE_CONNECT_TIMEOUT_MS",
                2000,
            )),
            cache_op_timeout: Duration::from_millis(env_or("CACHE_OP_TIMEOUT_MS", 250)),
            cache_reconnect_interval: Duration::from_secs(env_or(
                "CACHE_RECONNECT_INTERVAL_SECS",
                5,
            )),
            ttl_policy,
            tmdb_base_url: env_string("TMDB_BASE_URL", &defaults.tmdb_base_url),
            tmdb_api_key: env::var("TMDB_API_KEY").unwrap_or_default(),
            tmdb_image_base_url: env_string(
                "TMDB_IMAGE_BASE_URL",
                &defaults.tmdb_image_base_url,
            ),
            tmdb_timeout: Duration::from_secs(env_or("TMDB_TIMEOUT_SECS", 10)),
            jwt_secret: env_string("JWT_SECRET", DEV_JWT_SECRET),
            jwt_lifetime: Duration::from_secs(env_or("JWT_EXPIRES_IN_SECS", 2_592_000)),
            password_hash_rounds: env_or("PASSWORD_HASH_ROUNDS", DEFAULT_HASH_ROUNDS),
        }
    }

    /// True when tokens are signed with the built-in placeholder secret.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            cache_backend: CacheBackendKind::Redis,
            redis_url: "redis://localhost:6379".to_string(),
            cache_connect_timeout: Duration::from_millis(2000),
            cache_op_timeout: Duration::from_millis(250),
            cache_reconnect_interval: Duration::from_secs(5),
            ttl_policy: TtlPolicy::default(),
            tmdb_base_url: "https://api.themoviedb.org/3".to_string(),
            tmdb_api_key: String::new(),
            tmdb_image_base_url: "https://image.tmdb.org/t/p/".to_string(),
            tmdb_timeout: Duration::from_secs(10),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime: Duration::from_secs(2_592_000),
            password_hash_rounds: DEFAULT_HASH_ROUNDS,
        }
    }
}
