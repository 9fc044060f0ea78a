//! Account Handlers

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::accounts::{AccountProfile, NewAccount};
use crate::api::{ApiJson, AppState, AuthUser};
use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, ItemResponse, LoginRequest, SignupRequest};

/// Handler for POST /api/signup
pub async fn signup_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::Validation(error_msg));
    }

    let account = state
        .accounts
        .create(NewAccount {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        })
        .await?;
    info!("Account {} registered", account.id);

    let token = state.tokens.issue(&account.id)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(token, account.profile())),
    ))
}

/// Handler for POST /api/login
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (email, password) = req.credentials().ok_or_else(|| {
        ApiError::Validation("Please provide an email and password".to_string())
    })?;

    let account = state
        .accounts
        .verify_credential(email, password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = state.tokens.issue(&account.id)?;
    Ok(Json(AuthResponse::new(token, account.profile())))
}

/// Handler for GET /api/me
pub async fn me_handler(AuthUser(account): AuthUser) -> Json<ItemResponse<AccountProfile>> {
    Json(ItemResponse::new(account.profile()))
}
