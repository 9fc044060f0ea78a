//! Request DTOs for the movie API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.
//! Fields are optional so that missing values are reported with the API's
//! own messages instead of a deserialization rejection.

use serde::Deserialize;

use crate::content::{check_content, check_rating};

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Absent, non-numeric or zero pages fall back to the first page.
fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// `?page=` on listing routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

/// `?q=&page=` on the search route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl SearchQuery {
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }

    /// The query text exactly as sent, unless it is missing or blank.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.trim().is_empty())
    }
}

/// Movie ids arrive as either JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MovieIdInput {
    Text(String),
    Number(u64),
}

impl MovieIdInput {
    pub fn into_id(self) -> Option<String> {
        match self {
            MovieIdInput::Text(text) if text.trim().is_empty() => None,
            MovieIdInput::Text(text) => Some(text.trim().to_string()),
            MovieIdInput::Number(n) => Some(n.to_string()),
        }
    }
}

/// Request body for POST /api/signup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl SignupRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let name = self.name.as_deref().unwrap_or("").trim();
        let email = self.email.as_deref().unwrap_or("").trim();
        let password = self.password.as_deref().unwrap_or("");

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Some("Please provide name, email and password".to_string());
        }
        if !is_plausible_email(email) {
            return Some("Please provide a valid email".to_string());
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            ));
        }
        None
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// Request body for POST /api/login
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// The (email, password) pair when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().filter(|e| !e.trim().is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// Request body for POST /api/favorites
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    #[serde(default)]
    pub movie_id: Option<MovieIdInput>,
}

/// Request body for POST /api/reviews
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    pub movie_id: Option<MovieIdInput>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A review submission that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
    pub movie_id: String,
    pub content: String,
    pub rating: f64,
}

impl ReviewRequest {
    pub fn validate(self) -> Result<ValidReview, String> {
        let movie_id = self.movie_id.and_then(MovieIdInput::into_id);
        let content = self.content.filter(|c| !c.trim().is_empty());
        let (Some(movie_id), Some(content), Some(rating)) = (movie_id, content, self.rating)
        else {
            return Err("Please provide movieId, content and rating".to_string());
        };

        check_rating(rating).map_err(|e| e.to_string())?;
        check_content(&content).map_err(|e| e.to_string())?;
        Ok(ValidReview {
            movie_id,
            content,
            rating,
        })
    }
}

/// Request body for PUT /api/reviews/:id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewUpdateRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl ReviewUpdateRequest {
    /// Drops blank content, then requires at least one field.
    pub fn validate(self) -> Result<Self, String> {
        let content = self.content.filter(|c| !c.trim().is_empty());
        if content.is_none() && self.rating.is_none() {
            return Err("Please provide content or rating to update".to_string());
        }
        if let Some(rating) = self.rating {
            check_rating(rating).map_err(|e| e.to_string())?;
        }
        if let Some(content) = &content {
            check_content(content).map_err(|e| e.to_string())?;
        }
        Ok(Self {
            content,
            rating: self.rating,
        })
    }
}
