//! Movie Handlers
//!
//! Every movie route reads through the response cache; the catalog is only
//! called on a miss.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::{AppState, AuthUser};
use crate::cache::Operation;
use crate::catalog::{CatalogError, LatestMovie, MovieDetail};
use crate::error::{ApiError, Result};
use crate::models::{ItemResponse, ListingResponse, PageQuery, SearchQuery};

/// Handler for GET /api/movies/upcoming
pub async fn upcoming_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingResponse>> {
    let page = query.page();
    let catalog = &state.catalog;
    let response = state
        .cache
        .get_or_compute(Operation::UpcomingMovies, &[page.into()], None, || async move {
            catalog.upcoming(page).await.map(ListingResponse::from)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET /api/movies/latest
pub async fn latest_handler(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ItemResponse<LatestMovie>>> {
    let catalog = &state.catalog;
    let response = state
        .cache
        .get_or_compute(Operation::LatestMovie, &[], None, || async move {
            catalog.latest().await.map(ItemResponse::new)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET /api/movies/popular
pub async fn popular_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingResponse>> {
    let page = query.page();
    let catalog = &state.catalog;
    let response = state
        .cache
        .get_or_compute(Operation::PopularMovies, &[page.into()], None, || async move {
            catalog.popular(page).await.map(ListingResponse::from)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET /api/movies/top_rated
pub async fn top_rated_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingResponse>> {
    let page = query.page();
    let catalog = &state.catalog;
    let response = state
        .cache
        .get_or_compute(Operation::TopRatedMovies, &[page.into()], None, || async move {
            catalog.top_rated(page).await.map(ListingResponse::from)
        })
        .await?;
    Ok(Json(response))
}

/// Handler for GET /api/movies/search
///
/// A missing or blank `q` is rejected before the cache is consulted.
pub async fn search_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListingResponse>> {
    let text = query
        .query()
        .ok_or_else(|| ApiError::Validation("Please provide a search query".to_string()))?;
    let page = query.page();
    let catalog = &state.catalog;
    let response = state
        .cache
        .get_or_compute(
            Operation::SearchMovies,
            &[text.into(), page.into()],
            None,
            || async move { catalog.search(text, page).await.map(ListingResponse::from) },
        )
        .await?;
    Ok(Json(response))
}

/// Detail lookup shared by the detail route and the content handlers that
/// need to know a movie exists.
pub async fn cached_details(
    state: &AppState,
    id: &str,
) -> std::result::Result<ItemResponse<MovieDetail>, CatalogError> {
    let catalog = &state.catalog;
    state
        .cache
        .get_or_compute(Operation::MovieDetails, &[id.into()], None, || async move {
            catalog.details(id).await.map(ItemResponse::new)
        })
        .await
}

/// Handler for GET /api/movies/:id
pub async fn details_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse<MovieDetail>>> {
    Ok(Json(cached_details(&state, &id).await?))
}

/// Handler for GET /api/movies/:id/similar
pub async fn similar_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListingResponse>> {
    let page = query.page();
    let catalog = &state.catalog;
    let id = id.as_str();
    let response = state
        .cache
        .get_or_compute(
            Operation::SimilarMovies,
            &[id.into(), page.into()],
            None,
            || async move { catalog.similar(id, page).await.map(ListingResponse::from) },
        )
        .await?;
    Ok(Json(response))
}
