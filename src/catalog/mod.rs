//! Catalog Module
//!
//! The upstream movie metadata provider, the TMDB client that implements it,
//! and the access layer that shapes provider data into response items.

mod models;
mod provider;
mod service;
mod tmdb;

pub use models::{
    ImageUrls, LatestMovie, ListingKind, MovieDetail, MoviePage, MovieSummary, PosterSize,
};
pub use provider::{
    CatalogProvider, Genre, ProductionCountry, ProviderError, RawMovie, RawMovieDetails, RawPage,
};
pub use service::{Catalog, CatalogError};
pub use tmdb::{TmdbProvider, TmdbSettings};
