//! Registration and login endpoints.

use axum::{extract::State, Json};

use super::{ApiResponse, ApiResult};
use crate::auth;
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::AppState;

/// POST /api/auth/register - Register a new user.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<User> {
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let user = state.repo.create_user(&request, &password_hash).await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    Ok(ApiResponse::created(user).with_message("User registered"))
}

/// POST /api/auth/login - Authenticate and issue a credential.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    // Unknown email and wrong password are indistinguishable to the caller
    let user = state
        .repo
        .find_user_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !auth::verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = auth::issue_token(
        &user.id,
        user.role,
        state.config.signing_secret(),
        state.config.token_ttl_hours,
    )?;

    Ok(ApiResponse::ok(LoginResponse { token }))
}
