//! Passbook management routes.
//!
//! Covers the metadata surface only. Balances are read here but never
//! written; every balance change goes through the transaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use passbook_core::sanitize::{PassbookDraft, sanitize_passbook};
use passbook_db::{PassbookRepository, repositories::passbook::PassbookError};

/// Creates the passbook routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/passbooks", post(create_passbook))
        .route("/passbooks", get(list_passbooks))
        .route("/passbooks/{passbook_id}", get(get_passbook))
        .route("/passbooks/{passbook_id}", patch(update_passbook))
        .route("/passbooks/{passbook_id}", delete(delete_passbook))
}

/// Passbook create/update payload.
#[derive(Debug, Deserialize)]
pub struct PassbookRequest {
    /// Bank name.
    pub bank_name: String,
    /// Account number at the bank.
    pub account_number: String,
    /// User-facing nickname.
    pub nickname: String,
    /// Opening balance; ignored on update.
    #[serde(default)]
    pub total_balance: Decimal,
}

impl From<PassbookRequest> for PassbookDraft {
    fn from(req: PassbookRequest) -> Self {
        Self {
            bank_name: req.bank_name,
            account_number: req.account_number,
            nickname: req.nickname,
            total_balance: req.total_balance,
        }
    }
}

/// POST /passbooks - Create a passbook.
async fn create_passbook(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PassbookRequest>,
) -> impl IntoResponse {
    let draft = match sanitize_passbook(payload.into()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation_error", "message": e.to_string() })),
            )
                .into_response();
        }
    };

    let repo = PassbookRepository::new((*state.db).clone());
    match repo.create(auth.user_id(), draft).await {
        Ok(passbook) => {
            info!(passbook_id = %passbook.id, user_id = %auth.user_id(), "Passbook created");
            (StatusCode::CREATED, Json(passbook)).into_response()
        }
        Err(PassbookError::Duplicate) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "duplicate_account",
                "message": "Account already exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create passbook");
            internal_error()
        }
    }
}

/// GET /passbooks - List the caller's passbooks.
async fn list_passbooks(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = PassbookRepository::new((*state.db).clone());
    match repo.list_for_user(auth.user_id()).await {
        Ok(passbooks) => (StatusCode::OK, Json(passbooks)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list passbooks");
            internal_error()
        }
    }
}

/// GET `/passbooks/{passbook_id}` - Get one passbook.
async fn get_passbook(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(passbook_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PassbookRepository::new((*state.db).clone());
    match repo.find_owned(passbook_id, auth.user_id()).await {
        Ok(Some(passbook)) => (StatusCode::OK, Json(passbook)).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to get passbook");
            internal_error()
        }
    }
}

/// PATCH `/passbooks/{passbook_id}` - Update passbook metadata.
async fn update_passbook(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(passbook_id): Path<Uuid>,
    Json(payload): Json<PassbookRequest>,
) -> impl IntoResponse {
    let draft = match sanitize_passbook(payload.into()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation_error", "message": e.to_string() })),
            )
                .into_response();
        }
    };

    let repo = PassbookRepository::new((*state.db).clone());
    match repo.update(passbook_id, auth.user_id(), draft).await {
        Ok(passbook) => (StatusCode::OK, Json(passbook)).into_response(),
        Err(PassbookError::NotFound) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update passbook");
            internal_error()
        }
    }
}

/// DELETE `/passbooks/{passbook_id}` - Delete a passbook.
async fn delete_passbook(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(passbook_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PassbookRepository::new((*state.db).clone());
    match repo.delete(passbook_id, auth.user_id()).await {
        Ok(()) => {
            info!(passbook_id = %passbook_id, user_id = %auth.user_id(), "Passbook deleted");
            (
                StatusCode::OK,
                Json(json!({ "message": "Passbook deleted" })),
            )
                .into_response()
        }
        Err(PassbookError::NotFound) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete passbook");
            internal_error()
        }
    }
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Passbook not found"
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
