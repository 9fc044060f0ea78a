//! Favorite movies per account.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::content::StoreError;

/// Movie fields copied onto the favorite when it is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSnapshot {
    pub title: String,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub overview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub movie_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub movie_data: MovieSnapshot,
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Fails with `Conflict` when the account already favorited the movie.
    async fn add(
        &self,
        user_id: &str,
        movie_id: &str,
        movie_data: MovieSnapshot,
    ) -> Result<Favorite, StoreError>;

    /// Newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>, StoreError>;

    async fn remove(&self, user_id: &str, movie_id: &str) -> Result<Favorite, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryFavoriteStore {
    favorites: RwLock<Vec<Favorite>>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn add(
        &self,
        user_id: &str,
        movie_id: &str,
        movie_data: MovieSnapshot,
    ) -> Result<Favorite, StoreError> {
        let mut favorites = self.favorites.write().await;
        if favorites
            .iter()
            .any(|f| f.user_id == user_id && f.movie_id == movie_id)
        {
            return Err(StoreError::Conflict(
                "Movie is already in favorites".to_string(),
            ));
        }

        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            movie_id: movie_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            movie_data,
        };
        favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Favorite>, StoreError> {
        let favorites = self.favorites.read().await;
        // Reverse insertion order breaks ties between equal timestamps.
        let mut listed: Vec<Favorite> = favorites
            .iter()
            .rev()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn remove(&self, user_id: &str, movie_id: &str) -> Result<Favorite, StoreError> {
        let mut favorites = self.favorites.write().await;
        let index = favorites
            .iter()
            .position(|f| f.user_id == user_id && f.movie_id == movie_id)
            .ok_or_else(|| StoreError::NotFound("Favorite not found".to_string()))?;
        Ok(favorites.remove(index))
    }
}
