//! Account holder lookup handler.
//!
//! - GET /api/v1/account-holders/:tax_id - Holder details and wallet balance

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{error::AppError, models::AccountHolderResponse, state::AppState};

/// Get an account holder and their current balance.
///
/// # Response (200)
///
/// ```json
/// {
///   "tax_id": "12345678900",
///   "email": "ana@example.com",
///   "is_merchant": false,
///   "balance": "100.00"
/// }
/// ```
pub async fn get_account_holder(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> Result<Json<AccountHolderResponse>, AppError> {
    let holder = state.service.find_account_holder(&tax_id).await?;
    Ok(Json(holder.into()))
}
