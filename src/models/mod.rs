//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables.

/// Account holder model
pub mod account_holder;
/// Transaction record model and request types
pub mod transaction;
/// Wallet balance container
pub mod wallet;

pub use account_holder::{AccountHolder, AccountHolderResponse};
pub use transaction::{
    DepositRequest, NewTransactionRecord, TransactionKind, TransactionRecord, TransactionResponse,
    TransactionStatus, TransferRequest,
};
pub use wallet::{MONEY_SCALE, Wallet};
