//! Review Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::movies::cached_details;
use crate::api::{ApiJson, AppState, AuthUser};
use crate::content::{NewReview, Review, ReviewUpdate};
use crate::error::{ApiError, Result};
use crate::models::{CollectionResponse, Empty, ItemResponse, ReviewRequest, ReviewUpdateRequest};

/// How many reviews GET /api/reviews/:movieId returns.
pub const TOP_REVIEWS: usize = 5;

/// Loads a review and checks the caller wrote it.
async fn owned_review(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    action: &str,
) -> Result<Review> {
    let review = state
        .reviews
        .find(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;
    if review.user_id != user.id {
        return Err(ApiError::Unauthorized(format!(
            "Not authorized to {} this review",
            action
        )));
    }
    Ok(review)
}

/// Handler for POST /api/reviews
pub async fn add_review_handler(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<ItemResponse<Review>>)> {
    let valid = req.validate().map_err(ApiError::Validation)?;
    cached_details(&state, &valid.movie_id).await?;

    let review = state
        .reviews
        .create(NewReview {
            movie_id: valid.movie_id,
            user_id: user.id.clone(),
            author_name: user.name.clone(),
            content: valid.content,
            rating: valid.rating,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ItemResponse::new(review))))
}

/// Handler for GET /api/reviews/:movieId
pub async fn movie_reviews_handler(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(movie_id): Path<String>,
) -> Result<Json<CollectionResponse<Review>>> {
    cached_details(&state, &movie_id).await?;
    let reviews = state.reviews.top_for_movie(&movie_id, TOP_REVIEWS).await?;
    Ok(Json(CollectionResponse::new(reviews)))
}

/// Handler for PUT /api/reviews/:reviewId
pub async fn update_review_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<String>,
    ApiJson(req): ApiJson<ReviewUpdateRequest>,
) -> Result<Json<ItemResponse<Review>>> {
    let update = req.validate().map_err(ApiError::Validation)?;
    owned_review(&state, &user, &review_id, "update").await?;

    let review = state
        .reviews
        .update(
            &review_id,
            ReviewUpdate {
                content: update.content,
                rating: update.rating,
            },
        )
        .await?;
    Ok(Json(ItemResponse::new(review)))
}

/// Handler for DELETE /api/reviews/:reviewId
pub async fn delete_review_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<String>,
) -> Result<Json<ItemResponse<Empty>>> {
    owned_review(&state, &user, &review_id, "delete").await?;
    state.reviews.delete(&review_id).await?;
    Ok(Json(ItemResponse::new(Empty {})))
}
