//! Authentication routes for register, login, and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use passbook_core::auth::{hash_password, verify_password};
use passbook_db::{SessionRepository, UserRepository};
use passbook_shared::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo,
};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// POST /auth/register - Register a new user.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let username = payload.username.trim();
    let email = payload.email.trim();
    if username.is_empty() || email.is_empty() || payload.password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_request",
                "message": "Username, email and password are required"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    // Check if username or email is already taken
    match user_repo.username_or_email_exists(username, email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "user_exists",
                    "message": "An account with this username or email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking username");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    // Create user
    let user = match user_repo.create(username, email, &password_hash).await {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during registration"
                })),
            )
                .into_response();
        }
    };

    info!(user_id = %user.id, username = %user.username, "New user registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email
            },
            "message": "Registration successful"
        })),
    )
        .into_response()
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by username
    let user = match user_repo.find_by_username(payload.username.trim()).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid username or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    };

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid username or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred during login"
                })),
            )
                .into_response();
        }
    }

    // Generate tokens
    let access_token = match state.jwt_service.generate_access_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_login_error();
        }
    };

    let refresh_token = match state.jwt_service.generate_refresh_token(user.id) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_login_error();
        }
    };

    // Record the refresh token so it can be revoked later
    let session_repo = SessionRepository::new((*state.db).clone());
    let expires_at = Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expires_in());
    if let Err(e) = session_repo.create(user.id, &refresh_token, expires_at).await {
        error!(error = %e, "Failed to record session");
        return internal_login_error();
    }

    info!(user_id = %user.id, "User logged in successfully");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
        },
        access_token,
        refresh_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/refresh - Rotate the refresh token and issue a new access token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // Validate refresh token signature and expiry
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            let (error, message) = match e {
                passbook_shared::JwtError::Expired => {
                    ("token_expired", "Refresh token has expired")
                }
                _ => ("invalid_token", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    // The token must still be backed by a live session
    let session_repo = SessionRepository::new((*state.db).clone());
    let session = match session_repo
        .find_active(claims.user_id(), &payload.refresh_token)
        .await
    {
        Ok(Some(s)) => s,
        Ok(None) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_token",
                    "message": "Refresh token has been revoked"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during token refresh");
            return internal_refresh_error();
        }
    };

    // Rotate: revoke the old session, issue a fresh pair
    if let Err(e) = session_repo.revoke(session.id).await {
        error!(error = %e, "Failed to revoke session");
        return internal_refresh_error();
    }

    let access_token = match state.jwt_service.generate_access_token(claims.user_id()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_refresh_error();
        }
    };

    let refresh_token = match state.jwt_service.generate_refresh_token(claims.user_id()) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate refresh token");
            return internal_refresh_error();
        }
    };

    let expires_at = Utc::now() + Duration::seconds(state.jwt_service.refresh_token_expires_in());
    if let Err(e) = session_repo
        .create(claims.user_id(), &refresh_token, expires_at)
        .await
    {
        error!(error = %e, "Failed to record session");
        return internal_refresh_error();
    }

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

fn internal_login_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred during login"
        })),
    )
        .into_response()
}

fn internal_refresh_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred during token refresh"
        })),
    )
        .into_response()
}
