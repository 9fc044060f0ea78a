//! API Routes
//!
//! Configures the Axum router with all movie API endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::accounts::{login_handler, me_handler, signup_handler};
use super::favorites::{add_favorite_handler, list_favorites_handler, remove_favorite_handler};
use super::health::health_handler;
use super::movies::{
    details_handler, latest_handler, popular_handler, search_handler, similar_handler,
    top_rated_handler, upcoming_handler,
};
use super::reviews::{
    add_review_handler, delete_review_handler, movie_reviews_handler, update_review_handler,
};
use super::AppState;

/// Creates the main router with all endpoints configured.
///
/// Routes under `/api/movies`, `/api/reviews` and `/api/favorites` as well as
/// `/api/me` require a bearer token.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let movies = Router::new()
        .route("/upcoming", get(upcoming_handler))
        .route("/latest", get(latest_handler))
        .route("/popular", get(popular_handler))
        .route("/top_rated", get(top_rated_handler))
        .route("/search", get(search_handler))
        .route("/:id", get(details_handler))
        .route("/:id/similar", get(similar_handler));

    let api = Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/me", get(me_handler))
        .nest("/movies", movies)
        .route("/reviews", post(add_review_handler))
        .route(
            "/reviews/:id",
            get(movie_reviews_handler)
                .put(update_review_handler)
                .delete(delete_review_handler),
        )
        .route(
            "/favorites",
            post(add_favorite_handler).get(list_favorites_handler),
        )
        .route(
            "/favorites/:movie_id",
            axum::routing::delete(remove_favorite_handler),
        );

    Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
