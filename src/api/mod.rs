//! API Module
//!
//! HTTP handlers and routing for the movie API.
//!
//! # Endpoints
//! - `POST /api/signup`, `POST /api/login`, `GET /api/me`
//! - `GET /api/movies/{upcoming,latest,popular,top_rated,search}`
//! - `GET /api/movies/:id`, `GET /api/movies/:id/similar`
//! - `POST /api/reviews`, `GET|PUT|DELETE /api/reviews/:id`
//! - `POST|GET /api/favorites`, `DELETE /api/favorites/:movieId`
//! - `GET /health`

pub mod accounts;
pub mod extract;
pub mod favorites;
pub mod health;
pub mod movies;
pub mod reviews;
pub mod routes;
pub mod state;

pub use extract::{ApiJson, AuthUser};
pub use routes::create_router;
pub use state::AppState;
