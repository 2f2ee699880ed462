//! Wallet Transfer Service - Main Application Entry Point
//!
//! REST API for deposits into account holder wallets and transfers between
//! account holders.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **External services**: authorization check, notification toggle, mail inbox (reqwest)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build the external service clients and the transaction service
//! 5. Start server on configured port

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use wallet_transfer_service::{
    clients::{HttpAuthorizationClient, HttpNotificationClient},
    config, db, handlers,
    repository::PgLedgerStore,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    config.validate().map_err(anyhow::Error::msg)?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let authorizer = HttpAuthorizationClient::new(
        &config.authorization_url,
        &config.authorization_approved_message,
        config.http_timeout_secs,
    )?;
    let notifier = HttpNotificationClient::new(
        &config.notification_url,
        &config.mail_api_url,
        &config.mail_from,
        config.http_timeout_secs,
    )?;

    let state = AppState::new(
        Arc::new(PgLedgerStore::new(pool)),
        Arc::new(authorizer),
        Arc::new(notifier),
    );
    let app = handlers::create_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
