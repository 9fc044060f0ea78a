//! Error types for the movie API
//!
//! Provides unified error handling using thiserror. Component errors
//! (catalog, stores, tokens) convert into [`ApiError`] at the request boundary.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::accounts::TokenError;
use crate::cache::BackendError;
use crate::catalog::{CatalogError, ProviderError};
use crate::content::StoreError;

// == API Error Enum ==
/// Unified error type rendered as `{ "success": false, "error": ... }`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid caller-supplied data
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid or rejected credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness constraint violated (duplicate favorite, review, account)
    #[error("{0}")]
    Conflict(String),

    /// Catalog provider failed or timed out
    #[error("{0}")]
    Upstream(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error class.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            // Duplicates were always reported as bad requests by this API.
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                "Server Error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Conversions ==
impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound => ApiError::NotFound("Movie not found".to_string()),
            CatalogError::Unavailable(msg) => ApiError::Upstream(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Validation(msg) => ApiError::Validation(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(msg) => ApiError::Internal(msg),
            _ => ApiError::Unauthorized("Not authorized to access this route".to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

// == Startup Errors ==
/// Configuration problems detected while building the application state.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("cache backend: {0}")]
    Cache(#[from] BackendError),

    #[error("catalog provider: {0}")]
    Provider(#[from] ProviderError),
}

// == Result Type Alias ==
/// Convenience Result type for the movie API.
pub type Result<T> = std::result::Result<T, ApiError>;
