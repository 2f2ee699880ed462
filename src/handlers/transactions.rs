//! Transaction HTTP handlers.
//!
//! This module implements transaction-related API endpoints:
//! - POST /api/v1/transactions/deposit - Add money to a wallet
//! - POST /api/v1/transactions/transfer - Move money between account holders
//! - GET /api/v1/transactions/:id - Get transaction details

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{DepositRequest, TransactionResponse, TransferRequest},
    state::AppState,
};

/// Deposit into an account holder's wallet.
///
/// # Request Body
///
/// ```json
/// {
///   "sender_tax_id": "12345678900",
///   "amount": "100.00"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "kind": "deposit",
///   "sender_tax_id": "12345678900",
///   "recipient_tax_id": null,
///   "amount": "100.00",
///   "status": "completed",
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
pub async fn create_deposit(
    State(state): State<AppState>,
    Json(request): Json<DepositRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let record = state
        .service
        .deposit(&request.sender_tax_id, request.amount)
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Transfer money between account holders.
///
/// # Validation
///
/// - Sender must not be a merchant
/// - Sender must have sufficient balance
/// - The authorization service must approve
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), AppError> {
    let record = state
        .service
        .transfer(
            &request.sender_tax_id,
            &request.recipient_tax_id,
            request.amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Get transaction by ID.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, AppError> {
    let record = state.service.find_transaction(transaction_id).await?;
    Ok(Json(record.into()))
}
