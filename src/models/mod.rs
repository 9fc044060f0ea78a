//! Request and Response models for the movie API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    FavoriteRequest, LoginRequest, MovieIdInput, PageQuery, ReviewRequest, ReviewUpdateRequest,
    SearchQuery, SignupRequest, ValidReview,
};
pub use responses::{
    AuthResponse, CacheHealth, CollectionResponse, Empty, HealthResponse, ItemResponse,
    ListingResponse,
};
