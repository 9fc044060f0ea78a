//! Catalog provider seam and the provider's wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the upstream provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The requested item does not exist upstream
    #[error("resource not found")]
    NotFound,

    /// Timeout, transport failure, rate limiting, 5xx or an unreadable body
    #[error("provider unavailable: {0}")]
    Transient(String),
}

/// One page of a provider listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
}

/// A movie as it appears inside provider listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

/// A single movie as returned by the detail and latest endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Upstream movie metadata source.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn upcoming(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError>;

    async fn latest(&self) -> Result<RawMovieDetails, ProviderError>;

    async fn popular(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError>;

    async fn top_rated(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError>;

    async fn search(&self, query: &str, page: u32) -> Result<RawPage<RawMovie>, ProviderError>;

    async fn details(&self, id: &str) -> Result<RawMovieDetails, ProviderError>;

    async fn similar(&self, id: &str, page: u32) -> Result<RawPage<RawMovie>, ProviderError>;
}
