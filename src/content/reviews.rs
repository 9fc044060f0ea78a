//! Movie reviews, one per (movie, account).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::content::StoreError;

pub const MAX_CONTENT_CHARS: usize = 1000;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub author_name: String,
    pub avatar: String,
    pub content: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub movie_id: String,
    pub user_id: String,
    pub author_name: String,
    pub content: String,
    pub rating: f64,
}

/// Fields to change on an existing review; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    pub content: Option<String>,
    pub rating: Option<f64>,
}

/// Generated avatar image for an author name.
pub fn avatar_url(author_name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(author_name)
    )
}

pub fn check_rating(rating: f64) -> Result<(), StoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(StoreError::Validation(
            "Rating must be between 0 and 5".to_string(),
        ))
    }
}

pub fn check_content(content: &str) -> Result<(), StoreError> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(StoreError::Validation(format!(
            "Review cannot be more than {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Fails with `Conflict` when the account already reviewed the movie.
    async fn create(&self, review: NewReview) -> Result<Review, StoreError>;

    async fn find(&self, id: &str) -> Result<Option<Review>, StoreError>;

    /// Highest rating first, newest first among equal ratings.
    async fn top_for_movie(&self, movie_id: &str, limit: usize)
        -> Result<Vec<Review>, StoreError>;

    async fn update(&self, id: &str, update: ReviewUpdate) -> Result<Review, StoreError>;

    async fn delete(&self, id: &str) -> Result<Review, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<Vec<Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found() -> StoreError {
    StoreError::NotFound("Review not found".to_string())
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn create(&self, review: NewReview) -> Result<Review, StoreError> {
        check_rating(review.rating)?;
        check_content(&review.content)?;

        let mut reviews = self.reviews.write().await;
        if reviews
            .iter()
            .any(|r| r.movie_id == review.movie_id && r.user_id == review.user_id)
        {
            return Err(StoreError::Conflict(
                "You have already reviewed this movie. Please update your existing review."
                    .to_string(),
            ));
        }

        let created = Review {
            id: Uuid::new_v4().to_string(),
            avatar: avatar_url(&review.author_name),
            movie_id: review.movie_id,
            user_id: review.user_id,
            author_name: review.author_name,
            content: review.content,
            rating: review.rating,
            created_at: Utc::now(),
        };
        reviews.push(created.clone());
        Ok(created)
    }

    async fn find(&self, id: &str) -> Result<Option<Review>, StoreError> {
        Ok(self
            .reviews
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn top_for_movie(
        &self,
        movie_id: &str,
        limit: usize,
    ) -> Result<Vec<Review>, StoreError> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<Review> = reviews
            .iter()
            .rev()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        matching.truncate(limit);
        Ok(matching)
    }

    async fn update(&self, id: &str, update: ReviewUpdate) -> Result<Review, StoreError> {
        if let Some(rating) = update.rating {
            check_rating(rating)?;
        }
        if let Some(content) = &update.content {
            check_content(content)?;
        }

        let mut reviews = self.reviews.write().await;
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(not_found)?;
        if let Some(content) = update.content {
            review.content = content;
        }
        if let Some(rating) = update.rating {
            review.rating = rating;
        }
        Ok(review.clone())
    }

    async fn delete(&self, id: &str) -> Result<Review, StoreError> {
        let mut reviews = self.reviews.write().await;
        let index = reviews
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(not_found)?;
        Ok(reviews.remove(index))
    }
}
