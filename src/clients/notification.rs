//! HTTP notification client.
//!
//! Two collaborators sit behind this client:
//! - the notification toggle endpoint, answering `{"message": true|false}`
//! - an email-testing inbox (Mailpit HTTP API) used both to send messages and
//!   to look them up again

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{NotificationClient, build_http_client};
use crate::error::AppError;

/// Body returned by the notification toggle endpoint.
#[derive(Debug, Deserialize)]
pub struct NotificationToggleResponse {
    #[serde(default)]
    pub message: Option<bool>,
}

impl NotificationToggleResponse {
    /// Absent means "do not notify".
    pub fn enabled(&self) -> bool {
        self.message.unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MailAddress {
    pub email: String,
}

/// Payload of `POST /api/v1/send`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMailRequest {
    pub from: MailAddress,
    pub to: Vec<MailAddress>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InboxAddress {
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InboxSummary {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    to: Vec<InboxAddress>,
}

#[derive(Debug, Deserialize)]
struct InboxSearchResponse {
    #[serde(default)]
    messages: Vec<InboxSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InboxMessage {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone)]
pub struct HttpNotificationClient {
    http_client: Client,
    toggle_url: String,
    mail_api_url: String,
    from: String,
}

impl HttpNotificationClient {
    pub fn new(
        toggle_url: impl Into<String>,
        mail_api_url: impl Into<String>,
        from: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        Ok(Self {
            http_client: build_http_client(timeout_secs)?,
            toggle_url: toggle_url.into(),
            mail_api_url: mail_api_url.into().trim_end_matches('/').to_string(),
            from: from.into(),
        })
    }

    /// Whether the inbox holds a message to `recipient` whose text is `body`.
    #[instrument(skip(self, body))]
    pub async fn inbox_contains(&self, recipient: &str, body: &str) -> Result<bool, AppError> {
        let search: InboxSearchResponse = self
            .get_json(
                &format!("{}/api/v1/search", self.mail_api_url),
                &[("query", format!("to:\"{recipient}\""))],
            )
            .await?;

        for summary in search.messages {
            if !summary.to.iter().any(|to| to.address == recipient) {
                continue;
            }

            let message: InboxMessage = self
                .get_json(
                    &format!("{}/api/v1/message/{}", self.mail_api_url, summary.id),
                    &[],
                )
                .await?;

            if message.text.trim_end() == body {
                return Ok(true);
            }
        }

        Ok(false)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!(url, error = %e, "Mail inbox request failed");
                AppError::ExternalService(format!("Mail inbox request failed: {e}"))
            })?;

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid mail inbox response: {e}")))
    }
}

#[async_trait]
impl NotificationClient for HttpNotificationClient {
    #[instrument(skip(self), fields(url = %self.toggle_url))]
    async fn should_notify(&self) -> Result<bool, AppError> {
        let response = self
            .http_client
            .get(&self.toggle_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                AppError::ExternalService(format!("Notification toggle request failed: {e}"))
            })?;

        let body: NotificationToggleResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Invalid notification toggle response: {e}"))
        })?;

        Ok(body.enabled())
    }

    #[instrument(skip(self, body))]
    async fn send_message(
        &self,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), AppError> {
        let payload = SendMailRequest {
            from: MailAddress {
                email: self.from.clone(),
            },
            to: vec![MailAddress {
                email: recipient_email.to_string(),
            }],
            subject: subject.to_string(),
            text: body.to_string(),
        };

        self.http_client
            .post(format!("{}/api/v1/send", self.mail_api_url))
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ExternalService(format!("Mail send failed: {e}")))?;

        debug!(recipient = recipient_email, "Notification handed to mail transport");
        Ok(())
    }
}
