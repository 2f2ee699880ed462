//! Transaction data models and API request/response types.
//!
//! This module defines:
//! - `TransactionRecord`: the immutable audit entry for a deposit or transfer attempt
//! - `NewTransactionRecord`: a record about to be persisted
//! - Request types for deposit and transfer operations
//! - `TransactionResponse`: Response body returned to clients

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account_holder::AccountHolder;
use crate::error::AppError;

/// Outcome of a transaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Failed,
    /// Not produced by deposit or transfer yet
    Pending,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "pending" => Ok(TransactionStatus::Pending),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown transaction status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown transaction kind: {other}"
            ))),
        }
    }
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Each record:
/// - Is written once per attempted operation, success or failure
/// - Always has a sender; has a recipient iff it is a transfer
/// - Is never updated after insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub sender_tax_id: String,
    pub recipient_tax_id: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

/// Raw `transactions` row; status and kind are stored as text.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TransactionRow {
    pub id: Uuid,
    pub sender_tax_id: String,
    pub recipient_tax_id: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for TransactionRecord {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            sender_tax_id: row.sender_tax_id,
            recipient_tax_id: row.recipient_tax_id,
            amount: row.amount,
            status: row.status.parse()?,
            kind: row.kind.parse()?,
            created_at: row.created_at,
        })
    }
}

/// A transaction record that has not been persisted yet.
///
/// The constructors tie the recipient to the kind: deposits never carry
/// one, transfers always do.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransactionRecord {
    pub sender_tax_id: String,
    pub recipient_tax_id: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub kind: TransactionKind,
}

impl NewTransactionRecord {
    pub fn deposit(sender: &AccountHolder, amount: Decimal, status: TransactionStatus) -> Self {
        Self {
            sender_tax_id: sender.tax_id.clone(),
            recipient_tax_id: None,
            amount,
            status,
            kind: TransactionKind::Deposit,
        }
    }

    pub fn transfer(
        sender: &AccountHolder,
        recipient: &AccountHolder,
        amount: Decimal,
        status: TransactionStatus,
    ) -> Self {
        Self {
            sender_tax_id: sender.tax_id.clone(),
            recipient_tax_id: Some(recipient.tax_id.clone()),
            amount,
            status,
            kind: TransactionKind::Transfer,
        }
    }

    /// Materialize the record with a store-assigned id and timestamp.
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord {
            id,
            sender_tax_id: self.sender_tax_id,
            recipient_tax_id: self.recipient_tax_id,
            amount: self.amount,
            status: self.status,
            kind: self.kind,
            created_at,
        }
    }
}

/// Request to deposit money into an account holder's wallet.
///
/// # JSON Example
///
/// ```json
/// {
///   "sender_tax_id": "12345678900",
///   "amount": "100.00"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Account holder whose wallet receives the money
    pub sender_tax_id: String,

    pub amount: Decimal,
}

/// Request to transfer money between account holders.
///
/// # JSON Example
///
/// ```json
/// {
///   "sender_tax_id": "12345678900",
///   "recipient_tax_id": "98765432100",
///   "amount": "50.00"
/// }
/// ```
///
/// # Atomicity Guarantee
///
/// BOTH wallets are updated in the same database transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender_tax_id: String,
    pub recipient_tax_id: String,
    pub amount: Decimal,
}

/// Response returned for transaction operations.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "kind": "transfer",
///   "sender_tax_id": "12345678900",
///   "recipient_tax_id": "98765432100",
///   "amount": "50.00",
///   "status": "completed",
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub sender_tax_id: String,
    pub recipient_tax_id: Option<String>,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            sender_tax_id: record.sender_tax_id,
            recipient_tax_id: record.recipient_tax_id,
            amount: record.amount,
            status: record.status,
            created_at: record.created_at,
        }
    }
}
