//! End-to-end service flows with the real HTTP clients against mocked endpoints.

use std::sync::Arc;

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

use wallet_transfer_service::clients::{HttpAuthorizationClient, HttpNotificationClient};
use wallet_transfer_service::error::ErrorKind;
use wallet_transfer_service::models::{AccountHolder, TransactionStatus};
use wallet_transfer_service::services::TransactionService;
use wallet_transfer_service::test_utils::InMemoryLedgerStore;

async fn mount_external(server: &MockServer, authorized: &str, notify: bool) {
    Mock::given(method("GET"))
        .and(path("/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": authorized})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/toggle"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": notify})))
        .mount(server)
        .await;
}

fn service(server: &MockServer, store: Arc<InMemoryLedgerStore>) -> TransactionService {
    let authorizer =
        HttpAuthorizationClient::new(format!("{}/authorize", server.uri()), "Authorized", 5)
            .unwrap();
    let notifier = HttpNotificationClient::new(
        format!("{}/toggle", server.uri()),
        server.uri(),
        "no-reply@wallet.local",
        5,
    )
    .unwrap();
    TransactionService::new(store as _, Arc::new(authorizer), Arc::new(notifier))
}

#[tokio::test]
async fn test_deposit_sends_single_success_email() {
    let server = MockServer::start().await;
    mount_external(&server, "Authorized", true).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/send"))
        .and(body_partial_json(json!({"To": [{"Email": "a@example.com"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ID": "x"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryLedgerStore::with_holders(vec![AccountHolder::new(
        "A",
        "a@example.com",
        false,
        dec!(0),
    )]));
    let record = service(&server, store.clone())
        .deposit("A", dec!(100.0))
        .await
        .unwrap();

    assert_eq!(store.balance_of("A"), Some(dec!(100.0)));
    assert_eq!(record.status, TransactionStatus::Completed);
    assert_eq!(store.transactions().len(), 1);
}

#[tokio::test]
async fn test_denied_transfer_with_notifications_off() {
    let server = MockServer::start().await;
    mount_external(&server, "Denied", false).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryLedgerStore::with_holders(vec![
        AccountHolder::new("A", "a@example.com", false, dec!(100)),
        AccountHolder::new("B", "b@example.com", false, dec!(0)),
    ]));
    let err = service(&server, store.clone())
        .transfer("A", "B", dec!(50.0))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
    assert_eq!(store.balance_of("A"), Some(dec!(100)));
    assert_eq!(store.balance_of("B"), Some(dec!(0)));

    let records = store.transactions();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, TransactionStatus::Failed);
    assert_eq!(records[0].sender_tax_id, "A");
    assert_eq!(records[0].recipient_tax_id.as_deref(), Some("B"));
    assert_eq!(records[0].amount, dec!(50.0));
}
