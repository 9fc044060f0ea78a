//! Response DTOs for the movie API
//!
//! Defines the structure of outgoing HTTP response bodies. Movie responses are
//! also the cached payloads, so they round-trip through serde.

use serde::{Deserialize, Serialize};

use crate::accounts::AccountProfile;
use crate::cache::CacheStats;
use crate::catalog::{MoviePage, MovieSummary};

/// Paged movie listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub success: bool,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub data: Vec<MovieSummary>,
}

impl From<MoviePage> for ListingResponse {
    fn from(page: MoviePage) -> Self {
        Self {
            success: true,
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            data: page.results,
        }
    }
}

/// `{ success, data }` around a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ success, count, data }` around a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> CollectionResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Empty {}

/// Response body for signup and login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub data: AccountProfile,
}

impl AuthResponse {
    pub fn new(token: String, data: AccountProfile) -> Self {
        Self {
            success: true,
            token,
            data,
        }
    }
}

/// Response body for health check endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    pub cache: CacheHealth,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheHealth {
    pub backend: String,
    pub live: bool,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl HealthResponse {
    /// The service stays healthy while the cache is down; `cache.live` says so.
    pub fn healthy(backend: &str, live: bool, stats: &CacheStats) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache: CacheHealth {
                backend: backend.to_string(),
                live,
                hits: stats.hits,
                misses: stats.misses,
                hit_rate: stats.hit_rate(),
            },
        }
    }
}
