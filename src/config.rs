//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Mock endpoint answering `{"message": "..."}` for transaction authorization.
pub const DEFAULT_AUTHORIZATION_URL: &str =
    "https://run.mocky.io/v3/5794d450-d2e2-4412-8131-73d0293ac1cc";

/// Mock endpoint answering `{"message": true|false}` for the notification toggle.
pub const DEFAULT_NOTIFICATION_URL: &str =
    "https://run.mocky.io/v3/54dc2cf1-3add-45b5-b5a9-6bf7e7f1f4a6";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `AUTHORIZATION_URL` (optional): authorization check endpoint
/// - `AUTHORIZATION_APPROVED_MESSAGE` (optional): `message` value meaning "approved", defaults to `Authorized`
/// - `NOTIFICATION_URL` (optional): notification toggle endpoint
/// - `MAIL_API_URL` (optional): email-testing inbox base URL, defaults to `http://localhost:8025`
/// - `MAIL_FROM` (optional): sender address for notification emails
/// - `HTTP_TIMEOUT_SECS` (optional): outbound HTTP timeout, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_authorization_url")]
    pub authorization_url: String,

    #[serde(default = "default_approved_message")]
    pub authorization_approved_message: String,

    #[serde(default = "default_notification_url")]
    pub notification_url: String,

    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_authorization_url() -> String {
    DEFAULT_AUTHORIZATION_URL.to_string()
}

fn default_approved_message() -> String {
    "Authorized".to_string()
}

fn default_notification_url() -> String {
    DEFAULT_NOTIFICATION_URL.to_string()
}

fn default_mail_api_url() -> String {
    "http://localhost:8025".to_string()
}

fn default_mail_from() -> String {
    "no-reply@wallet.local".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }

    /// Check that every outbound endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("AUTHORIZATION_URL", &self.authorization_url),
            ("NOTIFICATION_URL", &self.notification_url),
            ("MAIL_API_URL", &self.mail_api_url),
        ] {
            let parsed =
                url::Url::parse(value).map_err(|e| format!("{name} is not a valid URL: {e}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(format!("{name} must use HTTP or HTTPS"));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err("HTTP_TIMEOUT_SECS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut vars = vec![(
            "DATABASE_URL".to_string(),
            "postgres://localhost/wallet".to_string(),
        )];
        vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        vars
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.authorization_url, DEFAULT_AUTHORIZATION_URL);
        assert_eq!(config.authorization_approved_message, "Authorized");
        assert_eq!(config.mail_api_url, "http://localhost:8025");
        assert_eq!(config.http_timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let result = envy::from_iter::<_, Config>(Vec::<(String, String)>::new());
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_urls() {
        let config: Config =
            envy::from_iter(vars(&[("NOTIFICATION_URL", "not a url")])).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("NOTIFICATION_URL"));

        let config: Config =
            envy::from_iter(vars(&[("MAIL_API_URL", "ftp://mail.local")])).unwrap();
        assert!(config.validate().is_err());
    }
}
