//! Contracts for the external services a transaction talks to.

use async_trait::async_trait;

use crate::error::AppError;

pub mod authorization;
pub mod notification;

pub use authorization::HttpAuthorizationClient;
pub use notification::HttpNotificationClient;

/// External approve/deny check run before money moves.
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    /// `Ok(false)` is a denial. `Err` means the check itself could not run.
    async fn check_authorization(&self) -> Result<bool, AppError>;
}

/// Notification toggle plus mail delivery.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Whether notifications should currently be sent at all.
    async fn should_notify(&self) -> Result<bool, AppError>;

    /// Hand a message to the mail transport. No delivery confirmation.
    async fn send_message(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), AppError>;
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::ExternalService(format!("HTTP client error: {e}")))
}
