//! Transaction service - Core business logic for deposits and transfers.
//!
//! This service handles:
//! - Atomic wallet updates inside one unit of work per operation
//! - Business rule validation (merchant senders, balance, amount)
//! - The external authorization check
//! - Audit records for every attempt, successful or not
//! - Status notifications by email
//!
//! # Failure Path
//!
//! Any error inside an operation rolls the unit of work back, then a
//! `failed` record is written outside it for the audit trail, and the cause
//! is surfaced wrapped in [`AppError::OperationFailed`].

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::clients::{AuthorizationClient, NotificationClient};
use crate::error::{AppError, Operation};
use crate::models::{
    AccountHolder, MONEY_SCALE, NewTransactionRecord, TransactionKind, TransactionRecord,
    TransactionStatus,
};
use crate::repository::{LedgerStore, UnitOfWork};

/// Subject line of every status email.
pub const NOTIFICATION_SUBJECT: &str = "Transação";

/// Orchestrates deposits and transfers over a [`LedgerStore`].
pub struct TransactionService {
    store: Arc<dyn LedgerStore>,
    authorizer: Arc<dyn AuthorizationClient>,
    notifier: Arc<dyn NotificationClient>,
}

impl TransactionService {
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        authorizer: Arc<dyn AuthorizationClient>,
        notifier: Arc<dyn NotificationClient>,
    ) -> Self {
        Self {
            store,
            authorizer,
            notifier,
        }
    }

    /// Add `amount` to the sender's wallet.
    ///
    /// # Process
    ///
    /// 1. Start a unit of work and lock the sender
    /// 2. Credit the wallet and stage a `completed` deposit record
    /// 3. Ask the authorization service; a denial aborts
    /// 4. Commit, then notify the sender
    ///
    /// # Errors
    ///
    /// Always `OperationFailed`, whose `kind()` tells the cause apart:
    /// - `InvalidAmount`: amount is not positive or has more than two
    ///   decimal places (no record is written)
    /// - `AccountHolderNotFound`: unknown sender
    /// - `NotAuthorized`: authorization denied
    /// - `Database` / `ExternalService`: infrastructure failure
    #[instrument(skip_all, fields(sender = %sender_tax_id, amount = %amount))]
    pub async fn deposit(
        &self,
        sender_tax_id: &str,
        amount: Decimal,
    ) -> Result<TransactionRecord, AppError> {
        ensure_valid_amount(amount)
            .map_err(|e| AppError::operation_failed(Operation::Deposit, e))?;

        let mut uow = self
            .store
            .begin()
            .await
            .map_err(|e| AppError::operation_failed(Operation::Deposit, e))?;

        let applied = self.apply_deposit(uow.as_mut(), sender_tax_id, amount).await;
        let outcome = match applied {
            Ok(applied) => uow.commit().await.map(|()| applied),
            Err(e) => {
                rollback(uow).await;
                Err(e)
            }
        };

        match outcome {
            Ok((record, sender)) => {
                info!(transaction_id = %record.id, "Deposit completed");
                self.notify_status(&record, TransactionStatus::Completed, &sender, None)
                    .await;
                Ok(record)
            }
            Err(cause) => {
                warn!(error = %cause, "Deposit failed, rolled back");
                self.record_failed_deposit(sender_tax_id, amount).await;
                Err(AppError::operation_failed(Operation::Deposit, cause))
            }
        }
    }

    /// Move `amount` from the sender's wallet to the recipient's.
    ///
    /// # Process
    ///
    /// 1. Start a unit of work and lock both holders
    /// 2. Validate: sender is not a merchant, sender can cover `amount`,
    ///    authorization service approves
    /// 3. Debit sender, credit recipient, commit
    /// 4. Write the `completed` record and notify the recipient
    ///
    /// # Errors
    ///
    /// Always `OperationFailed`, wrapping one of:
    /// - `InvalidAmount` (no record is written)
    /// - `AccountHolderNotFound`
    /// - `SameAccountTransfer`, `MerchantCannotTransfer`, `InsufficientBalance`
    /// - `NotAuthorized`
    /// - `Database` / `ExternalService`
    #[instrument(skip_all, fields(sender = %sender_tax_id, recipient = %recipient_tax_id, amount = %amount))]
    pub async fn transfer(
        &self,
        sender_tax_id: &str,
        recipient_tax_id: &str,
        amount: Decimal,
    ) -> Result<TransactionRecord, AppError> {
        ensure_valid_amount(amount)
            .map_err(|e| AppError::operation_failed(Operation::Transfer, e))?;

        let mut uow = self
            .store
            .begin()
            .await
            .map_err(|e| AppError::operation_failed(Operation::Transfer, e))?;

        let applied = self
            .apply_transfer(uow.as_mut(), sender_tax_id, recipient_tax_id, amount)
            .await;
        let outcome = match applied {
            Ok(parties) => uow.commit().await.map(|()| parties),
            Err(e) => {
                rollback(uow).await;
                Err(e)
            }
        };

        let (sender, recipient) = match outcome {
            Ok(parties) => parties,
            Err(cause) => {
                warn!(error = %cause, "Transfer failed, rolled back");
                self.record_failed_transfer(sender_tax_id, recipient_tax_id, amount)
                    .await;
                return Err(AppError::operation_failed(Operation::Transfer, cause));
            }
        };

        // Money has moved; a failure from here on must not produce a `failed` record.
        let record = self
            .store
            .record_transaction(NewTransactionRecord::transfer(
                &sender,
                &recipient,
                amount,
                TransactionStatus::Completed,
            ))
            .await
            .map_err(|e| {
                error!(error = %e, "Transfer committed but its completed record could not be written");
                AppError::operation_failed(Operation::Transfer, e)
            })?;

        info!(transaction_id = %record.id, "Transfer completed");
        self.notify_status(
            &record,
            TransactionStatus::Completed,
            &sender,
            Some(&recipient),
        )
        .await;

        Ok(record)
    }

    pub async fn find_transaction(&self, id: Uuid) -> Result<TransactionRecord, AppError> {
        self.store
            .find_transaction(id)
            .await?
            .ok_or(AppError::TransactionNotFound)
    }

    pub async fn find_account_holder(&self, tax_id: &str) -> Result<AccountHolder, AppError> {
        self.store
            .find_by_tax_id(tax_id)
            .await?
            .ok_or_else(|| AppError::AccountHolderNotFound(tax_id.to_string()))
    }

    /// Email the party concerned by `record` about `status`, if the
    /// notification toggle is on.
    ///
    /// Deposits notify the sender, transfers the recipient. Failures are
    /// logged and never affect the operation that triggered them.
    pub async fn notify_status(
        &self,
        record: &TransactionRecord,
        status: TransactionStatus,
        sender: &AccountHolder,
        recipient: Option<&AccountHolder>,
    ) {
        match self.notifier.should_notify().await {
            Ok(true) => {}
            Ok(false) => {
                debug!(transaction_id = %record.id, "Notifications disabled");
                return;
            }
            Err(e) => {
                error!(transaction_id = %record.id, error = %e, "Notification toggle check failed");
                return;
            }
        }

        let email = match record.kind {
            TransactionKind::Deposit => Some(sender.email.as_str()),
            TransactionKind::Transfer => recipient.map(|r| r.email.as_str()),
        };
        let Some(email) = email else {
            debug!(transaction_id = %record.id, "No recipient to notify");
            return;
        };

        let message = status_message(record, status);
        if let Err(e) = self
            .notifier
            .send_message(email, NOTIFICATION_SUBJECT, &message)
            .await
        {
            error!(transaction_id = %record.id, error = %e, "Failed to send notification");
        }
    }

    async fn apply_deposit(
        &self,
        uow: &mut dyn UnitOfWork,
        sender_tax_id: &str,
        amount: Decimal,
    ) -> Result<(TransactionRecord, AccountHolder), AppError> {
        let mut sender = lock_holder(uow, sender_tax_id).await?;
        sender.wallet.add_balance(amount);
        uow.save_wallet(&sender).await?;

        let record = uow
            .record_transaction(NewTransactionRecord::deposit(
                &sender,
                amount,
                TransactionStatus::Completed,
            ))
            .await?;

        self.authorize().await?;

        Ok((record, sender))
    }

    async fn apply_transfer(
        &self,
        uow: &mut dyn UnitOfWork,
        sender_tax_id: &str,
        recipient_tax_id: &str,
        amount: Decimal,
    ) -> Result<(AccountHolder, AccountHolder), AppError> {
        if sender_tax_id == recipient_tax_id {
            return Err(AppError::SameAccountTransfer);
        }

        // Lock in tax ID order so opposite transfers cannot deadlock
        let (mut sender, mut recipient) = if sender_tax_id < recipient_tax_id {
            let sender = lock_holder(uow, sender_tax_id).await?;
            (sender, lock_holder(uow, recipient_tax_id).await?)
        } else {
            let recipient = lock_holder(uow, recipient_tax_id).await?;
            (lock_holder(uow, sender_tax_id).await?, recipient)
        };

        self.validate_transfer(&sender, amount).await?;

        sender.wallet.subtract_balance(amount)?;
        recipient.wallet.add_balance(amount);

        uow.save_wallet(&sender).await?;
        uow.save_wallet(&recipient).await?;

        Ok((sender, recipient))
    }

    async fn validate_transfer(
        &self,
        sender: &AccountHolder,
        amount: Decimal,
    ) -> Result<(), AppError> {
        if sender.is_merchant {
            return Err(AppError::MerchantCannotTransfer);
        }

        if !sender.wallet.can_cover(amount) {
            return Err(AppError::InsufficientBalance);
        }

        self.authorize().await
    }

    async fn authorize(&self) -> Result<(), AppError> {
        if self.authorizer.check_authorization().await? {
            Ok(())
        } else {
            Err(AppError::NotAuthorized)
        }
    }

    async fn record_failed_deposit(&self, sender_tax_id: &str, amount: Decimal) {
        let sender = match self.store.find_by_tax_id(sender_tax_id).await {
            Ok(Some(sender)) => sender,
            Ok(None) => {
                warn!("Sender does not exist, no failed record written");
                return;
            }
            Err(e) => {
                error!(error = %e, "Could not load sender for failed record");
                return;
            }
        };

        let failed = NewTransactionRecord::deposit(&sender, amount, TransactionStatus::Failed);
        self.write_failed_record(failed, &sender, None).await;
    }

    /// Parties are reloaded from committed state; the in-flight copies were rolled back.
    async fn record_failed_transfer(
        &self,
        sender_tax_id: &str,
        recipient_tax_id: &str,
        amount: Decimal,
    ) {
        let parties = tokio::try_join!(
            self.store.find_by_tax_id(sender_tax_id),
            self.store.find_by_tax_id(recipient_tax_id),
        );

        let (sender, recipient) = match parties {
            Ok((Some(sender), Some(recipient))) => (sender, recipient),
            Ok(_) => {
                warn!("Sender or recipient does not exist, no failed record written");
                return;
            }
            Err(e) => {
                error!(error = %e, "Could not load parties for failed record");
                return;
            }
        };

        let failed =
            NewTransactionRecord::transfer(&sender, &recipient, amount, TransactionStatus::Failed);
        self.write_failed_record(failed, &sender, Some(&recipient))
            .await;
    }

    async fn write_failed_record(
        &self,
        failed: NewTransactionRecord,
        sender: &AccountHolder,
        recipient: Option<&AccountHolder>,
    ) {
        match self.store.record_transaction(failed).await {
            Ok(record) => {
                info!(transaction_id = %record.id, "Failed attempt recorded");
                self.notify_status(&record, TransactionStatus::Failed, sender, recipient)
                    .await;
            }
            Err(e) => error!(error = %e, "Could not write failed record"),
        }
    }
}

/// Body of the status email for `record`.
pub fn status_message(record: &TransactionRecord, status: TransactionStatus) -> String {
    match status {
        TransactionStatus::Completed => {
            format!("A transação {} foi concluída com sucesso.", record.id)
        }
        TransactionStatus::Failed => format!("A transação {} falhou.", record.id),
        other => format!("A transação {} está com o status: {}.", record.id, other),
    }
}

/// Amounts must be positive and fit the stored scale exactly; Postgres
/// would otherwise round sub-cent values on write.
fn ensure_valid_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO || amount.normalize().scale() > MONEY_SCALE {
        return Err(AppError::InvalidAmount);
    }
    Ok(())
}

async fn lock_holder(uow: &mut dyn UnitOfWork, tax_id: &str) -> Result<AccountHolder, AppError> {
    uow.lock_by_tax_id(tax_id)
        .await?
        .ok_or_else(|| AppError::AccountHolderNotFound(tax_id.to_string()))
}

async fn rollback(uow: Box<dyn UnitOfWork>) {
    if let Err(e) = uow.rollback().await {
        error!(error = %e, "Rollback failed");
    }
}
