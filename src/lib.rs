//! Wallet transfer service.
//!
//! Account holders own one wallet each. Money enters a wallet through a
//! deposit and moves between wallets through a transfer. Every attempt
//! leaves an audit record, is checked against an external authorization
//! service, and may trigger an email notification.

pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
