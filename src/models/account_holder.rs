//! Account holder data model and API response type.
//!
//! This module defines:
//! - `AccountHolder`: Database entity identified by a tax ID, owning one wallet
//! - `AccountHolderResponse`: Response body returned to clients

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wallet::Wallet;

/// Represents an account holder record from the database.
///
/// # Database Table
///
/// Maps to the `account_holders` table. Each holder:
/// - Is identified by a unique tax ID (CPF or CNPJ)
/// - Owns exactly one wallet, stored inline as the `balance` column
/// - Is either a regular user or a merchant
///
/// Account holders are created outside this service and only loaded here.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct AccountHolder {
    /// Unique tax identifier
    pub tax_id: String,

    /// Address that receives transaction notifications
    pub email: String,

    /// Merchants can receive transfers but cannot send them
    pub is_merchant: bool,

    #[sqlx(flatten)]
    pub wallet: Wallet,
}

impl AccountHolder {
    pub fn new(
        tax_id: impl Into<String>,
        email: impl Into<String>,
        is_merchant: bool,
        balance: Decimal,
    ) -> Self {
        Self {
            tax_id: tax_id.into(),
            email: email.into(),
            is_merchant,
            wallet: Wallet::new(balance),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.wallet.balance()
    }
}

/// Response body for the account holder lookup endpoint.
///
/// # JSON Example
///
/// ```json
/// {
///   "tax_id": "12345678900",
///   "email": "ana@example.com",
///   "is_merchant": false,
///   "balance": "100.00"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountHolderResponse {
    pub tax_id: String,
    pub email: String,
    pub is_merchant: bool,
    pub balance: Decimal,
}

impl From<AccountHolder> for AccountHolderResponse {
    fn from(holder: AccountHolder) -> Self {
        Self {
            balance: holder.balance(),
            tax_id: holder.tax_id,
            email: holder.email,
            is_merchant: holder.is_merchant,
        }
    }
}
