//! Test doubles for the store and the external clients.

mod mocks;

pub use mocks::{
    InMemoryLedgerStore, MockAuthorizationClient, MockNotificationClient, SentMessage,
};
