//! PostgreSQL-backed ledger store.
//!
//! # Atomicity Guarantees
//!
//! Every [`PgUnitOfWork`] wraps one PostgreSQL transaction. Account holders
//! are loaded with `FOR UPDATE`, so concurrent operations on the same wallet
//! queue behind each other instead of racing on read-modify-write.

use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{LedgerStore, UnitOfWork};
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::transaction::TransactionRow;
use crate::models::{AccountHolder, NewTransactionRecord, TransactionRecord};

const SELECT_HOLDER: &str =
    "SELECT tax_id, email, is_merchant, balance FROM account_holders WHERE tax_id = $1";

// FOR UPDATE holds the row until commit or rollback
const LOCK_HOLDER: &str =
    "SELECT tax_id, email, is_merchant, balance FROM account_holders WHERE tax_id = $1 FOR UPDATE";

const INSERT_TRANSACTION: &str = r#"
    INSERT INTO transactions (sender_tax_id, recipient_tax_id, amount, status, kind)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, sender_tax_id, recipient_tax_id, amount, status, kind, created_at
"#;

#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: DbPool,
}

impl PgLedgerStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<AccountHolder>, AppError> {
        let holder = sqlx::query_as::<_, AccountHolder>(SELECT_HOLDER)
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(holder)
    }

    async fn record_transaction(
        &self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, AppError> {
        let row = insert_query(&record).fetch_one(&self.pool).await?;
        row.try_into()
    }

    async fn find_transaction(&self, id: Uuid) -> Result<Option<TransactionRecord>, AppError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, sender_tax_id, recipient_tax_id, amount, status, kind, created_at FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRecord::try_from).transpose()
    }
}

/// Unit of work over a single PostgreSQL transaction.
///
/// If dropped without `commit`, sqlx rolls the transaction back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_by_tax_id(&mut self, tax_id: &str) -> Result<Option<AccountHolder>, AppError> {
        let holder = sqlx::query_as::<_, AccountHolder>(LOCK_HOLDER)
            .bind(tax_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(holder)
    }

    async fn save_wallet(&mut self, holder: &AccountHolder) -> Result<(), AppError> {
        let updated = sqlx::query(
            "UPDATE account_holders SET balance = $1, updated_at = NOW() WHERE tax_id = $2",
        )
        .bind(holder.balance())
        .bind(&holder.tax_id)
        .execute(&mut *self.tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::AccountHolderNotFound(holder.tax_id.clone()));
        }

        Ok(())
    }

    async fn record_transaction(
        &mut self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, AppError> {
        let row = insert_query(&record).fetch_one(&mut *self.tx).await?;
        row.try_into()
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

fn insert_query(
    record: &NewTransactionRecord,
) -> sqlx::query::QueryAs<'_, Postgres, TransactionRow, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, TransactionRow>(INSERT_TRANSACTION)
        .bind(&record.sender_tax_id)
        .bind(&record.recipient_tax_id)
        .bind(record.amount)
        .bind(record.status.as_str())
        .bind(record.kind.as_str())
}
