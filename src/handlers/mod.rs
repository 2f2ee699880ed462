//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Delegates to the transaction service
//! 3. Returns HTTP response (JSON, status code)

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Account holder lookup endpoint
pub mod account_holders;
/// Service health endpoint
pub mod health;
/// Deposit, transfer and transaction lookup endpoints
pub mod transactions;

/// Build the HTTP router with every route and the tracing layer.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/v1/transactions/deposit",
            post(transactions::create_deposit),
        )
        .route(
            "/api/v1/transactions/transfer",
            post(transactions::create_transfer),
        )
        .route(
            "/api/v1/transactions/{id}",
            get(transactions::get_transaction),
        )
        .route(
            "/api/v1/account-holders/{tax_id}",
            get(account_holders::get_account_holder),
        )
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
