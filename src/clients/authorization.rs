//! HTTP authorization client.
//!
//! Calls the external authorization endpoint with a plain GET. The endpoint
//! answers `{"message": "<verdict>"}`; only a 200 carrying the configured
//! approval message counts as approved.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use super::{AuthorizationClient, build_http_client};
use crate::error::AppError;

/// Body returned by the authorization endpoint.
#[derive(Debug, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthorizationResponse {
    /// A missing `message` never approves.
    pub fn is_approved(&self, approved_message: &str) -> bool {
        self.message.as_deref() == Some(approved_message)
    }
}

#[derive(Debug, Clone)]
pub struct HttpAuthorizationClient {
    http_client: Client,
    url: String,
    approved_message: String,
}

impl HttpAuthorizationClient {
    pub fn new(
        url: impl Into<String>,
        approved_message: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, AppError> {
        Ok(Self {
            http_client: build_http_client(timeout_secs)?,
            url: url.into(),
            approved_message: approved_message.into(),
        })
    }
}

#[async_trait]
impl AuthorizationClient for HttpAuthorizationClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn check_authorization(&self) -> Result<bool, AppError> {
        let response = self
            .http_client
            .get(&self.url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Authorization request failed");
                AppError::ExternalService(format!("Authorization request failed: {e}"))
            })?;

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), "Authorization endpoint returned non-200");
            return Ok(false);
        }

        let body: AuthorizationResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Authorization response could not be parsed");
            AppError::ExternalService(format!("Invalid authorization response: {e}"))
        })?;

        let approved = body.is_approved(&self.approved_message);
        debug!(approved, message = ?body.message, "Authorization verdict");
        Ok(approved)
    }
}
