//! Error types and HTTP error response handling.
//!
//! This module defines all application errors, the coarse [`ErrorKind`]
//! callers branch on, and how errors are converted into HTTP responses.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The operation a wrapped failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deposit,
    Transfer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Deposit => f.write_str("deposit"),
            Operation::Transfer => f.write_str("transfer"),
        }
    }
}

/// Coarse classification of every [`AppError`].
///
/// Callers match on this instead of inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A sender, recipient or transaction identifier does not resolve.
    NotFound,
    /// The request breaks a business rule (merchant sender, insufficient balance, ...).
    BusinessRule,
    /// The external authorization service denied the operation.
    AuthorizationDenied,
    /// The store or an external client call itself failed.
    Infrastructure,
}

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Not found**: unknown account holder or transaction
/// - **Business rules**: merchant sender, insufficient balance, bad amount
/// - **Authorization**: external authorizer said no
/// - **Infrastructure**: database or HTTP failures
/// - **Operation failed**: the wrapper surfaced by deposit and transfer
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An outbound HTTP call failed or returned an unreadable body.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// No account holder is registered under this tax ID.
    #[error("Account holder not found: {0}")]
    AccountHolderNotFound(String),

    #[error("Transaction not found")]
    TransactionNotFound,

    /// Merchants may receive transfers but never send them.
    #[error("Merchants cannot send transfers")]
    MerchantCannotTransfer,

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Cannot transfer to the same account holder")]
    SameAccountTransfer,

    /// Amount is zero, negative, or finer than a cent.
    #[error("Amount must be positive with at most 2 decimal places")]
    InvalidAmount,

    /// The authorization service denied the operation.
    #[error("Transaction not authorized")]
    NotAuthorized,

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// A deposit or transfer failed and was rolled back.
    ///
    /// The original error is kept as `source`.
    #[error("Failed to perform {operation}: {source}")]
    OperationFailed {
        operation: Operation,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Wrap `self` as the failure of `operation`.
    pub fn operation_failed(operation: Operation, source: AppError) -> Self {
        AppError::OperationFailed {
            operation,
            source: Box::new(source),
        }
    }

    /// Classify this error. Wrapped failures report the kind of their cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::AccountHolderNotFound(_) | AppError::TransactionNotFound => {
                ErrorKind::NotFound
            }
            AppError::MerchantCannotTransfer
            | AppError::InsufficientBalance
            | AppError::SameAccountTransfer
            | AppError::InvalidAmount
            | AppError::InvalidRequest(_) => ErrorKind::BusinessRule,
            AppError::NotAuthorized => ErrorKind::AuthorizationDenied,
            AppError::Database(_) | AppError::ExternalService(_) => ErrorKind::Infrastructure,
            AppError::OperationFailed { source, .. } => source.kind(),
        }
    }

    /// The innermost error, skipping any `OperationFailed` wrappers.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::OperationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    fn code(&self) -> &'static str {
        match self.root_cause() {
            AppError::Database(_) | AppError::ExternalService(_) => "internal_error",
            AppError::AccountHolderNotFound(_) => "account_holder_not_found",
            AppError::TransactionNotFound => "transaction_not_found",
            AppError::MerchantCannotTransfer => "merchant_cannot_transfer",
            AppError::InsufficientBalance => "insufficient_balance",
            AppError::SameAccountTransfer => "same_account_transfer",
            AppError::InvalidAmount => "invalid_amount",
            AppError::NotAuthorized => "not_authorized",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::OperationFailed { .. } => "operation_failed",
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "insufficient_balance",
///     "message": "Failed to perform transfer: Insufficient balance"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `NotFound` → 404 Not Found
/// - `BusinessRule` → 422 Unprocessable Entity (`InvalidRequest` → 400)
/// - `AuthorizationDenied` → 403 Forbidden
/// - `Infrastructure` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match (self.kind(), self.root_cause()) {
            (_, AppError::InvalidRequest(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            (ErrorKind::NotFound, _) => (StatusCode::NOT_FOUND, self.to_string()),
            (ErrorKind::BusinessRule, _) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            (ErrorKind::AuthorizationDenied, _) => (StatusCode::FORBIDDEN, self.to_string()),
            (ErrorKind::Infrastructure, _) => {
                tracing::error!(error = %self, "Request failed on infrastructure error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
