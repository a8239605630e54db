//! User profile routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use passbook_core::auth::{hash_password, verify_password};
use passbook_db::UserRepository;
use passbook_shared::auth::{ResetPasswordRequest, UserInfo};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users/me", patch(reset_password))
}

/// GET /users/me - Get the authenticated user's profile.
async fn get_me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());
    match repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(UserInfo {
                id: user.id,
                username: user.username,
                email: user.email,
            }),
        )
            .into_response(),
        Ok(None) => user_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to load user profile");
            internal_error()
        }
    }
}

/// PATCH /users/me - Change the authenticated user's password.
async fn reset_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    if payload.new_password.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_request",
                "message": "New password is required"
            })),
        )
            .into_response();
    }

    let repo = UserRepository::new((*state.db).clone());
    let user = match repo.find_by_id(auth.user_id()).await {
        Ok(Some(u)) => u,
        Ok(None) => return user_not_found(),
        Err(e) => {
            error!(error = %e, "Database error during password reset");
            return internal_error();
        }
    };

    // The current password gates the change
    match verify_password(&payload.old_password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Password reset with wrong current password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Current password is incorrect"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.new_password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    match repo.update_password(user.id, &password_hash).await {
        Ok(Some(_)) => {
            info!(user_id = %user.id, "Password changed");
            (
                StatusCode::OK,
                Json(json!({ "message": "Password updated" })),
            )
                .into_response()
        }
        Ok(None) => user_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update password");
            internal_error()
        }
    }
}

fn user_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "User not found"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
