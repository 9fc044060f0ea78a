//! Content Module
//!
//! Per-account favorites and movie reviews. Content is never cached.

mod error;
mod favorites;
mod reviews;

pub use error::StoreError;
pub use favorites::{Favorite, FavoriteStore, InMemoryFavoriteStore, MovieSnapshot};
pub use reviews::{
    avatar_url, check_content, check_rating, InMemoryReviewStore, NewReview, Review,
    ReviewStore, ReviewUpdate, MAX_CONTENT_CHARS,
};
