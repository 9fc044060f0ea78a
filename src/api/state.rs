//! Application state shared across all handlers.

use std::sync::Arc;

use tracing::info;

use crate::accounts::{AccountStore, InMemoryAccountStore, TokenService};
use crate::cache::{
    CacheStore, KeyValueBackend, MemoryBackend, ReadThroughCache, RedisBackend, RedisSettings,
};
use crate::catalog::{Catalog, ImageUrls, TmdbProvider, TmdbSettings};
use crate::config::{CacheBackendKind, Config};
use crate::content::{FavoriteStore, InMemoryFavoriteStore, InMemoryReviewStore, ReviewStore};
use crate::error::StartupError;

/// Everything a request needs. Cloning is cheap; all members are shared.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ReadThroughCache>,
    pub catalog: Catalog,
    pub tokens: TokenService,
    pub accounts: Arc<dyn AccountStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

impl AppState {
    /// Creates a new AppState with in-memory account and content stores.
    pub fn new(cache: Arc<ReadThroughCache>, catalog: Catalog, tokens: TokenService) -> Self {
        Self {
            cache,
            catalog,
            tokens,
            accounts: Arc::new(InMemoryAccountStore::new()),
            favorites: Arc::new(InMemoryFavoriteStore::new()),
            reviews: Arc::new(InMemoryReviewStore::new()),
        }
    }

    /// Replaces the account store.
    pub fn with_accounts(mut self, accounts: Arc<dyn AccountStore>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Connects the cache backend and builds the provider client from `config`.
    ///
    /// An unreachable cache is not an error; the service starts uncached.
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let backend: Arc<dyn KeyValueBackend> = match config.cache_backend {
            CacheBackendKind::Redis => Arc::new(
                RedisBackend::connect(RedisSettings {
                    url: config.redis_url.clone(),
                    connect_timeout: config.cache_connect_timeout,
                    reconnect_interval: config.cache_reconnect_interval,
                })
                .await?,
            ),
            CacheBackendKind::Memory => Arc::new(MemoryBackend::new()),
        };
        info!("Cache backend: {}", backend.name());

        let store = Arc::new(CacheStore::new(backend, config.cache_op_timeout));
        let cache = Arc::new(ReadThroughCache::new(store, config.ttl_policy.clone()));

        let provider = TmdbProvider::new(TmdbSettings {
            base_url: config.tmdb_base_url.clone(),
            api_key: config.tmdb_api_key.clone(),
            timeout: config.tmdb_timeout,
        })?;
        let catalog = Catalog::new(
            Arc::new(provider),
            ImageUrls::new(config.tmdb_image_base_url.clone()),
        );

        let tokens = TokenService::new(&config.jwt_secret, config.jwt_lifetime);

        let accounts = InMemoryAccountStore::with_hash_rounds(config.password_hash_rounds);

        Ok(Self::new(cache, catalog, tokens).with_accounts(Arc::new(accounts)))
    }
}
