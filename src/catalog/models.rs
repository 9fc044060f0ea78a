//! Shaped catalog items, independent of the provider's wire format.

use serde::{Deserialize, Serialize};

use crate::catalog::provider::{Genre, ProductionCountry, RawMovie, RawMovieDetails, RawPage};

/// Poster rendition requested from the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    W500,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W500 => "w500",
            PosterSize::Original => "original",
        }
    }
}

/// Builds absolute image URLs from provider-relative paths.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// `None` when the provider has no image for the item.
    pub fn poster(&self, path: Option<&str>, size: PosterSize) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| {
            format!(
                "{}{}/{}",
                self.base,
                size.as_str(),
                p.trim_start_matches('/')
            )
        })
    }
}

/// Which listing a summary came from; decides the extra fields it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Upcoming,
    Popular,
    TopRated,
    Search,
    Similar,
}

/// One movie inside a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub genres: Vec<u64>,
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
}

impl MovieSummary {
    pub fn from_raw(raw: RawMovie, kind: ListingKind, images: &ImageUrls) -> Self {
        let mut summary = Self {
            id: raw.id,
            title: raw.title,
            poster_path: images.poster(raw.poster_path.as_deref(), PosterSize::W500),
            genres: raw.genre_ids,
            overview: raw.overview,
            release_date: None,
            popularity: None,
            vote_count: None,
            vote_average: None,
        };
        match kind {
            ListingKind::Upcoming | ListingKind::Search | ListingKind::Similar => {
                summary.release_date = raw.release_date;
            }
            ListingKind::Popular => summary.popularity = raw.popularity,
            ListingKind::TopRated => {
                summary.vote_count = raw.vote_count;
                summary.vote_average = raw.vote_average;
            }
        }
        summary
    }
}

/// A shaped page of results plus paging totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<MovieSummary>,
}

impl MoviePage {
    pub fn from_raw(raw: RawPage<RawMovie>, kind: ListingKind, images: &ImageUrls) -> Self {
        Self {
            page: raw.page,
            total_pages: raw.total_pages,
            total_results: raw.total_results,
            results: raw
                .results
                .into_iter()
                .map(|movie| MovieSummary::from_raw(movie, kind, images))
                .collect(),
        }
    }
}

/// Full detail record for one movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub genres: Vec<Genre>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
    pub original_language: Option<String>,
    pub production_countries: Vec<ProductionCountry>,
    pub vote_count: Option<u64>,
    pub vote_average: Option<f64>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub homepage: Option<String>,
    pub poster_path: Option<String>,
}

impl MovieDetail {
    pub fn from_raw(raw: RawMovieDetails, images: &ImageUrls) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            overview: raw.overview,
            genres: raw.genres,
            popularity: raw.popularity,
            release_date: raw.release_date,
            original_language: raw.original_language,
            production_countries: raw.production_countries,
            vote_count: raw.vote_count,
            vote_average: raw.vote_average,
            budget: raw.budget,
            revenue: raw.revenue,
            homepage: raw.homepage,
            poster_path: images.poster(raw.poster_path.as_deref(), PosterSize::Original),
        }
    }
}

/// The most recently added movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestMovie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    pub overview: Option<String>,
}

impl LatestMovie {
    pub fn from_raw(raw: RawMovieDetails, images: &ImageUrls) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            poster_path: images.poster(raw.poster_path.as_deref(), PosterSize::W500),
            release_date: raw.release_date,
            genres: raw.genres,
            overview: raw.overview,
        }
    }
}
