//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle units of work, validation, and calls to external services.

pub mod transaction_service;

pub use transaction_service::{NOTIFICATION_SUBJECT, TransactionService, status_message};
