//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::clients::{AuthorizationClient, NotificationClient};
use crate::repository::LedgerStore;
use crate::services::TransactionService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
    pub store: Arc<dyn LedgerStore>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn LedgerStore>,
        authorizer: Arc<dyn AuthorizationClient>,
        notifier: Arc<dyn NotificationClient>,
    ) -> Self {
        let service = Arc::new(TransactionService::new(
            Arc::clone(&store),
            authorizer,
            notifier,
        ));
        Self { service, store }
    }
}
