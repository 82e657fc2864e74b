//! Discord Webhook通知器のテスト

use crate::support::at;
use serde_json::Value;
use std::time::Duration;
use watchcat::notifier::{DiscordWebhookNotifier, Notifier, NotifyError};
use watchcat_common::types::NotificationMessage;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_message_as_code_block_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let notifier =
        DiscordWebhookNotifier::new(format!("{}/webhook", server.uri()), Duration::from_secs(5))
            .unwrap();
    notifier
        .notify(&NotificationMessage::timeout("batch", at(0)))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let content = body["content"].as_str().unwrap();
    assert!(content.starts_with("```\n"));
    assert!(content.ends_with("\n```"));

    let inner = content
        .trim_start_matches("```\n")
        .trim_end_matches("\n```");
    let message: NotificationMessage = serde_json::from_str(inner).unwrap();
    assert_eq!(message, NotificationMessage::timeout("batch", at(0)));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let notifier = DiscordWebhookNotifier::new(server.uri(), Duration::from_secs(5)).unwrap();
    let err = notifier
        .notify(&NotificationMessage::notify_error("batch", at(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Status(500)));
}
