//! Request extractors: bearer authentication and JSON bodies.

use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;

use crate::accounts::Account;
use crate::api::AppState;
use crate::error::ApiError;

/// The authenticated caller. Add it to a handler's arguments to require a
/// valid `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Account);

fn not_authorized() -> ApiError {
    ApiError::Unauthorized("Not authorized to access this route".to_string())
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(not_authorized)?;
        let claims = state.tokens.verify(token)?;
        let account = state
            .accounts
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(not_authorized)?;
        Ok(AuthUser(account))
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Account;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JSON request body whose rejections render as API validation errors.
///
/// A body that is not JSON, lacks the JSON content type, or does not match
/// `T` becomes a 400 with the usual `{success:false,error}` envelope.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
