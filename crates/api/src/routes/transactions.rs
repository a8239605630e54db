//! Transaction routes: the ledger's HTTP surface.
//!
//! A transaction is created by atomically updating its passbook's balance
//! and inserting the row in one storage transaction. There is no update or
//! delete here: recorded transactions are immutable, and corrections are
//! made with compensating entries.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use passbook_core::sanitize::{TransactionDraft, sanitize_transaction};
use passbook_db::{LedgerError, LedgerRepository};

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/passbooks/{passbook_id}/transactions",
            post(create_transaction),
        )
        .route(
            "/passbooks/{passbook_id}/transactions",
            get(list_transactions),
        )
        .route(
            "/passbooks/{passbook_id}/transactions/{transaction_id}",
            get(get_transaction),
        )
}

/// Transaction create payload.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// "CREDIT" or "DEBIT".
    pub transaction_type: String,
    /// Monetary amount; truncated to 2 decimal places before validation.
    pub amount: Decimal,
    /// Counterparty name.
    pub party_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: String,
    /// When the transaction took place; defaults to now.
    #[serde(default = "Utc::now")]
    pub transaction_date: DateTime<Utc>,
}

impl From<CreateTransactionRequest> for TransactionDraft {
    fn from(req: CreateTransactionRequest) -> Self {
        Self {
            transaction_type: req.transaction_type,
            amount: req.amount,
            party_name: req.party_name,
            description: req.description,
            tags: req.tags,
            transaction_date: req.transaction_date,
        }
    }
}

/// POST `/passbooks/{passbook_id}/transactions` - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(passbook_id): Path<Uuid>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    // Reject bad input before any storage access
    let clean = match sanitize_transaction(payload.into()) {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "validation_error", "message": e.to_string() })),
            )
                .into_response();
        }
    };

    let repo = LedgerRepository::new((*state.db).clone());
    match repo
        .apply_transaction(passbook_id, auth.user_id(), clean)
        .await
    {
        Ok(transaction) => {
            info!(
                transaction_id = %transaction.id,
                passbook_id = %passbook_id,
                user_id = %auth.user_id(),
                "Transaction recorded"
            );
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        // Missing and not-owned are reported identically
        Err(LedgerError::NotFoundOrUnauthorized) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "invalid_passbook",
                "message": "Invalid passbook"
            })),
        )
            .into_response(),
        Err(LedgerError::InsufficientBalance) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "insufficient_balance",
                "message": "Insufficient balance"
            })),
        )
            .into_response(),
        Err(LedgerError::Storage(e)) => {
            error!(error = %e, passbook_id = %passbook_id, "Failed to record transaction");
            internal_error()
        }
    }
}

/// GET `/passbooks/{passbook_id}/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(passbook_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo.list_transactions(passbook_id, auth.user_id()).await {
        Ok(transactions) => (StatusCode::OK, Json(transactions)).into_response(),
        Err(e) => {
            error!(error = %e, passbook_id = %passbook_id, "Failed to list transactions");
            internal_error()
        }
    }
}

/// GET `/passbooks/{passbook_id}/transactions/{transaction_id}` - Get one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((passbook_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());
    match repo
        .get_transaction(passbook_id, auth.user_id(), transaction_id)
        .await
    {
        Ok(Some(transaction)) => (StatusCode::OK, Json(transaction)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Transaction not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, transaction_id = %transaction_id, "Failed to get transaction");
            internal_error()
        }
    }
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
