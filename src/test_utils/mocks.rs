//! Mock implementations for testing.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::clients::{AuthorizationClient, NotificationClient};
use crate::error::AppError;
use crate::models::{AccountHolder, NewTransactionRecord, TransactionRecord};
use crate::repository::{LedgerStore, UnitOfWork};

#[derive(Debug, Default)]
struct LedgerState {
    holders: HashMap<String, AccountHolder>,
    transactions: Vec<TransactionRecord>,
}

/// In-memory ledger store.
///
/// Units of work stage changes locally and publish them on commit, so a
/// rollback leaves the store untouched.
#[derive(Debug)]
pub struct InMemoryLedgerStore {
    state: Arc<Mutex<LedgerState>>,
    failing_records: AtomicBool,
    is_healthy: AtomicBool,
}

impl InMemoryLedgerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_holders(Vec::new())
    }

    #[must_use]
    pub fn with_holders(holders: Vec<AccountHolder>) -> Self {
        let state = LedgerState {
            holders: holders
                .into_iter()
                .map(|h| (h.tax_id.clone(), h))
                .collect(),
            transactions: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            failing_records: AtomicBool::new(false),
            is_healthy: AtomicBool::new(true),
        }
    }

    pub fn insert_holder(&self, holder: AccountHolder) {
        self.state
            .lock()
            .unwrap()
            .holders
            .insert(holder.tax_id.clone(), holder);
    }

    /// Make records written outside a unit of work fail.
    pub fn set_failing_records(&self, failing: bool) {
        self.failing_records.store(failing, Ordering::Relaxed);
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    pub fn balance_of(&self, tax_id: &str) -> Option<Decimal> {
        self.state
            .lock()
            .unwrap()
            .holders
            .get(tax_id)
            .map(AccountHolder::balance)
    }

    /// Committed records, in insertion order.
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        self.state.lock().unwrap().transactions.clone()
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::ExternalService("Store unavailable".to_string()));
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        Ok(Box::new(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            wallets: HashMap::new(),
            staged: Vec::new(),
        }))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<AccountHolder>, AppError> {
        Ok(self.state.lock().unwrap().holders.get(tax_id).cloned())
    }

    async fn record_transaction(
        &self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, AppError> {
        if self.failing_records.load(Ordering::Relaxed) {
            return Err(AppError::ExternalService("Mock record failure".to_string()));
        }
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        self.state.lock().unwrap().transactions.push(record.clone());
        Ok(record)
    }

    async fn find_transaction(&self, id: Uuid) -> Result<Option<TransactionRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.transactions.iter().find(|t| t.id == id).cloned())
    }
}

struct InMemoryUnitOfWork {
    state: Arc<Mutex<LedgerState>>,
    wallets: HashMap<String, AccountHolder>,
    staged: Vec<TransactionRecord>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn lock_by_tax_id(&mut self, tax_id: &str) -> Result<Option<AccountHolder>, AppError> {
        if let Some(holder) = self.wallets.get(tax_id) {
            return Ok(Some(holder.clone()));
        }
        Ok(self.state.lock().unwrap().holders.get(tax_id).cloned())
    }

    async fn save_wallet(&mut self, holder: &AccountHolder) -> Result<(), AppError> {
        self.wallets.insert(holder.tax_id.clone(), holder.clone());
        Ok(())
    }

    async fn record_transaction(
        &mut self,
        record: NewTransactionRecord,
    ) -> Result<TransactionRecord, AppError> {
        let record = record.into_record(Uuid::new_v4(), Utc::now());
        self.staged.push(record.clone());
        Ok(record)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let InMemoryUnitOfWork {
            state,
            wallets,
            staged,
        } = *self;
        let mut ledger = state.lock().unwrap();
        ledger.holders.extend(wallets);
        ledger.transactions.extend(staged);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        Ok(())
    }
}

/// Mock authorization client with a switchable verdict
#[derive(Debug)]
pub struct MockAuthorizationClient {
    approve: AtomicBool,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl MockAuthorizationClient {
    #[must_use]
    pub fn approving() -> Self {
        Self {
            approve: AtomicBool::new(true),
            unavailable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn denying() -> Self {
        let client = Self::approving();
        client.set_approve(false);
        client
    }

    pub fn set_approve(&self, approve: bool) {
        self.approve.store(approve, Ordering::Relaxed);
    }

    /// Make every check fail as if the endpoint were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuthorizationClient for MockAuthorizationClient {
    async fn check_authorization(&self) -> Result<bool, AppError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(AppError::ExternalService(
                "Authorization endpoint unreachable".to_string(),
            ));
        }
        Ok(self.approve.load(Ordering::Relaxed))
    }
}

/// A message captured by [`MockNotificationClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Mock notification client that records every message it is asked to send
#[derive(Debug)]
pub struct MockNotificationClient {
    enabled: AtomicBool,
    failing: AtomicBool,
    sent: Mutex<Vec<SentMessage>>,
}

impl MockNotificationClient {
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        let client = Self::enabled();
        client.set_enabled(false);
        client
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Make `send_message` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationClient for MockNotificationClient {
    async fn should_notify(&self) -> Result<bool, AppError> {
        Ok(self.enabled.load(Ordering::Relaxed))
    }

    async fn send_message(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), AppError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(AppError::ExternalService("Mock mail failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            recipient: recipient_email.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
