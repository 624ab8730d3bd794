//! Checkout and ledger read handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{CheckoutRequest, Transaction};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(request) = body?;
    let transaction = state.db.checkout().checkout(&request.items).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /api/transaction/{id}
pub async fn get_transaction(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Transaction>> {
    let Path(id) = id?;
    state
        .db
        .transactions()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("Transaction", id))
}
