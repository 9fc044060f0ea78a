//! TMDB HTTP client implementing [`CatalogProvider`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::provider::{
    CatalogProvider, ProviderError, RawMovie, RawMovieDetails, RawPage,
};

/// Connection settings for the TMDB API.
#[derive(Debug, Clone)]
pub struct TmdbSettings {
    /// API root, e.g. `https://api.themoviedb.org/3`
    pub base_url: String,
    /// Sent as the `api_key` query parameter
    pub api_key: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

/// Shared, long-lived TMDB client.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl TmdbProvider {
    pub fn new(settings: TmdbSettings) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| ProviderError::Transient(format!("invalid base url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Transient(format!(
                "invalid base url: {}",
                settings.base_url
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ProviderError::Transient(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: settings.api_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = self.endpoint(segments);
        debug!("TMDB GET {}", url.path());

        let response = self
            .http
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Transient(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound),
            status if !status.is_success() => Err(ProviderError::Transient(format!(
                "unexpected status {}",
                status
            ))),
            _ => response
                .json::<T>()
                .await
                .map_err(|e| ProviderError::Transient(format!("malformed response: {}", e))),
        }
    }
}

fn page_param(page: u32) -> (&'static str, String) {
    ("page", page.to_string())
}

#[async_trait]
impl CatalogProvider for TmdbProvider {
    async fn upcoming(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.get_json(&["movie", "upcoming"], &[page_param(page)]).await
    }

    async fn latest(&self) -> Result<RawMovieDetails, ProviderError> {
        self.get_json(&["movie", "latest"], &[]).await
    }

    async fn popular(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.get_json(&["movie", "popular"], &[page_param(page)]).await
    }

    async fn top_rated(&self, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.get_json(&["movie", "top_rated"], &[page_param(page)]).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.get_json(
            &["search", "movie"],
            &[("query", query.to_string()), page_param(page)],
        )
        .await
    }

    async fn details(&self, id: &str) -> Result<RawMovieDetails, ProviderError> {
        self.get_json(&["movie", id], &[]).await
    }

    async fn similar(&self, id: &str, page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
        self.get_json(&["movie", id, "similar"], &[page_param(page)])
            .await
    }
}
