//! Persistence contracts.
//!
//! The transaction service never touches a pool directly. It asks a
//! [`LedgerStore`] for lookups and for a [`UnitOfWork`], which groups wallet
//! mutations and record inserts into one atomic commit or rollback.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AccountHolder, NewTransactionRecord, TransactionRecord};

pub mod postgres;

pub use postgres::PgLedgerStore;

/// Account holder store plus the entry point for units of work.
///
/// Reads and writes on the store itself are autocommitted; they see only
/// committed state.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Check store connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Open a new unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;

    /// Look up an account holder by tax ID.
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<AccountHolder>, AppError>;

    /// Persist a record outside any unit of work.
    async fn record_transaction(
        &self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, AppError>;

    async fn find_transaction(&self, id: Uuid) -> Result<Option<TransactionRecord>, AppError>;
}

/// One atomic unit of work.
///
/// Nothing staged here is visible outside until [`commit`](UnitOfWork::commit).
/// Dropping a unit of work without committing discards it.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Load an account holder and lock it until the unit of work ends.
    async fn lock_by_tax_id(&mut self, tax_id: &str) -> Result<Option<AccountHolder>, AppError>;

    /// Write the holder's wallet balance.
    async fn save_wallet(&mut self, holder: &AccountHolder) -> Result<(), AppError>;

    /// Insert a record as part of this unit of work.
    async fn record_transaction(
        &mut self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}
