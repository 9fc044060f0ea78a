//! Favorite Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::movies::cached_details;
use crate::api::{ApiJson, AppState, AuthUser};
use crate::content::{Favorite, MovieSnapshot};
use crate::error::{ApiError, Result};
use crate::models::{CollectionResponse, Empty, FavoriteRequest, ItemResponse, MovieIdInput};

/// Handler for POST /api/favorites
///
/// The movie must exist; its basic fields are copied onto the favorite.
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<FavoriteRequest>,
) -> Result<(StatusCode, Json<ItemResponse<Favorite>>)> {
    let movie_id = req
        .movie_id
        .and_then(MovieIdInput::into_id)
        .ok_or_else(|| ApiError::Validation("Please provide a movie ID".to_string()))?;

    let movie = cached_details(&state, &movie_id).await?.data;
    let snapshot = MovieSnapshot {
        title: movie.title,
        poster_path: movie.poster_path,
        release_date: movie.release_date,
        overview: movie.overview,
    };

    let favorite = state.favorites.add(&user.id, &movie_id, snapshot).await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::new(favorite))))
}

/// Handler for GET /api/favorites
pub async fn list_favorites_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CollectionResponse<Favorite>>> {
    let favorites = state.favorites.list_for_user(&user.id).await?;
    Ok(Json(CollectionResponse::new(favorites)))
}

/// Handler for DELETE /api/favorites/:movieId
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(movie_id): Path<String>,
) -> Result<Json<ItemResponse<Empty>>> {
    state.favorites.remove(&user.id, &movie_id).await?;
    Ok(Json(ItemResponse::new(Empty {})))
}
