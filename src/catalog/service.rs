//! Catalog access layer: calls the provider and shapes what it returns.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::catalog::models::{ImageUrls, LatestMovie, ListingKind, MovieDetail, MoviePage};
use crate::catalog::provider::{CatalogProvider, ProviderError};

/// Catalog failures as seen by the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("movie not found")]
    NotFound,

    /// Carries the client-facing message for the failed operation
    #[error("{0}")]
    Unavailable(String),
}

/// Uncached access to the movie catalog.
#[derive(Clone)]
pub struct Catalog {
    provider: Arc<dyn CatalogProvider>,
    images: ImageUrls,
}

impl Catalog {
    pub fn new(provider: Arc<dyn CatalogProvider>, images: ImageUrls) -> Self {
        Self { provider, images }
    }

    pub async fn upcoming(&self, page: u32) -> Result<MoviePage, CatalogError> {
        let raw = self
            .provider
            .upcoming(page)
            .await
            .map_err(|e| translate(e, "Failed to fetch upcoming movies"))?;
        Ok(MoviePage::from_raw(raw, ListingKind::Upcoming, &self.images))
    }

    pub async fn latest(&self) -> Result<LatestMovie, CatalogError> {
        let raw = self
            .provider
            .latest()
            .await
            .map_err(|e| translate(e, "Failed to fetch latest movie"))?;
        Ok(LatestMovie::from_raw(raw, &self.images))
    }

    pub async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError> {
        let raw = self
            .provider
            .popular(page)
            .await
            .map_err(|e| translate(e, "Failed to fetch popular movies"))?;
        Ok(MoviePage::from_raw(raw, ListingKind::Popular, &self.images))
    }

    pub async fn top_rated(&self, page: u32) -> Result<MoviePage, CatalogError> {
        let raw = self
            .provider
            .top_rated(page)
            .await
            .map_err(|e| translate(e, "Failed to fetch top rated movies"))?;
        Ok(MoviePage::from_raw(raw, ListingKind::TopRated, &self.images))
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        let raw = self
            .provider
            .search(query, page)
            .await
            .map_err(|e| translate(e, "Failed to search movies"))?;
        Ok(MoviePage::from_raw(raw, ListingKind::Search, &self.images))
    }

    pub async fn details(&self, id: &str) -> Result<MovieDetail, CatalogError> {
        let raw = self
            .provider
            .details(id)
            .await
            .map_err(|e| translate(e, "Failed to fetch movie details"))?;
        Ok(MovieDetail::from_raw(raw, &self.images))
    }

    pub async fn similar(&self, id: &str, page: u32) -> Result<MoviePage, CatalogError> {
        let raw = self
            .provider
            .similar(id, page)
            .await
            .map_err(|e| translate(e, "Failed to fetch similar movies"))?;
        Ok(MoviePage::from_raw(raw, ListingKind::Similar, &self.images))
    }
}

fn translate(error: ProviderError, message: &str) -> CatalogError {
    match error {
        ProviderError::NotFound => CatalogError::NotFound,
        ProviderError::Transient(reason) => {
            warn!("{}: {}", message, reason);
            CatalogError::Unavailable(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::provider::{RawMovie, RawMovieDetails, RawPage};
    use async_trait::async_trait;

    struct FixedProvider;

    fn page_of(ids: &[u64]) -> RawPage<RawMovie> {
        RawPage {
            page: 1,
            results: ids
                .iter()
                .map(|id| RawMovie {
                    id: *id,
                    title: format!("Movie {}", id),
                    poster_path: Some(format!("/{}.jpg", id)),
                    ..Default::default()
                })
                .collect(),
            total_pages: 1,
            total_results: ids.len() as u64,
        }
    }

    #[async_trait]
    impl CatalogProvider for FixedProvider {
        async fn upcoming(&self, _page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
            Err(ProviderError::Transient("connection reset".into()))
        }

        async fn latest(&self) -> Result<RawMovieDetails, ProviderError> {
            Ok(RawMovieDetails {
                id: 1,
                title: "Newest".into(),
                ..Default::default()
            })
        }

        async fn popular(&self, _page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
            Ok(page_of(&[1, 2, 3]))
        }

        async fn top_rated(&self, _page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
            Ok(page_of(&[]))
        }

        async fn search(&self, _q: &str, _page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
            Ok(page_of(&[]))
        }

        async fn details(&self, id: &str) -> Result<RawMovieDetails, ProviderError> {
            match id {
                "550" => Ok(RawMovieDetails {
                    id: 550,
                    title: "Fight Club".into(),
                    ..Default::default()
                }),
                _ => Err(ProviderError::NotFound),
            }
        }

        async fn similar(&self, _id: &str, _page: u32) -> Result<RawPage<RawMovie>, ProviderError> {
            Err(ProviderError::NotFound)
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            Arc::new(FixedProvider),
            ImageUrls::new("https://image.tmdb.org/t/p/"),
        )
    }

    #[tokio::test]
    async fn test_popular_shapes_results() {
        let page = catalog().popular(1).await.unwrap();

        assert_eq!(page.results.len(), 3);
        assert_eq!(
            page.results[0].poster_path.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/1.jpg")
        );
    }

    #[tokio::test]
    async fn test_transient_failure_maps_to_operation_message() {
        let err = catalog().upcoming(1).await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::Unavailable("Failed to fetch upcoming movies".into())
        );
    }

    #[tokio::test]
    async fn test_unknown_movie_is_not_found() {
        assert_eq!(
            catalog().details("999999").await.unwrap_err(),
            CatalogError::NotFound
        );
        assert_eq!(
            catalog().similar("999999", 1).await.unwrap_err(),
            CatalogError::NotFound
        );
    }

    #[tokio::test]
    async fn test_details_and_latest() {
        assert_eq!(catalog().details("550").await.unwrap().title, "Fight Club");
        assert_eq!(catalog().latest().await.unwrap().title, "Newest");
    }
}
