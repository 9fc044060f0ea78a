//! Movie API - movie catalog service with a read-through response cache
//!
//! Serves TMDB-backed movie listings and details through a Redis cache that
//! degrades to uncached operation, plus accounts, favorites and reviews.

pub mod accounts;
pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod content;
pub mod error;
pub mod models;

pub use api::{create_router, AppState};
pub use config::Config;
