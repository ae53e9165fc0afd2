// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{test_discord_settings, test_email_settings, test_slack_settings};
use notifyrs::channels::discord::DiscordChannel;
use notifyrs::channels::email::ResendEmailChannel;
use notifyrs::channels::slack::SlackChannel;
use notifyrs::channels::traits::{DiscordSender, EmailSender, SlackSender};
use notifyrs::domain::models::notification::{EmailMessage, Embed, SlackMessage};
use notifyrs::utils::errors::DeliveryError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn email_message() -> EmailMessage {
    EmailMessage {
        subject: "Hello".into(),
        html: "<p>Hi</p>".into(),
        recipients: vec!["user@example.com".into()],
    }
}

#[tokio::test]
async fn test_email_channel_posts_expected_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_partial_json(json!({
            "from": "noreply@example.com",
            "to": ["user@example.com"],
            "subject": "Hello",
            "html": "<p>Hi</p>",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_1"})))
        .expect(1)
        .mount(&server)
        .await;

    let channel = ResendEmailChannel::with_base_url(&test_email_settings(), server.uri());
    channel.send(&email_message()).await.unwrap();
}

#[tokio::test]
async fn test_email_channel_maps_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad key"})))
        .mount(&server)
        .await;

    let channel = ResendEmailChannel::with_base_url(&test_email_settings(), server.uri());
    let err = channel.send(&email_message()).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Auth(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_email_channel_maps_client_error_to_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "bad address"})))
        .mount(&server)
        .await;

    let channel = ResendEmailChannel::with_base_url(&test_email_settings(), server.uri());
    let err = channel.send(&email_message()).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Validation(_)));
}

#[tokio::test]
async fn test_email_channel_maps_server_error_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let channel = ResendEmailChannel::with_base_url(&test_email_settings(), server.uri());
    let err = channel.send(&email_message()).await.unwrap_err();
    assert!(matches!(err, DeliveryError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_slack_channel_prefixes_channel_mention() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(body_partial_json(json!({
            "channel": "#general",
            "text": "@channel deploy finished",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let channel = SlackChannel::with_base_url(&test_slack_settings(), server.uri());
    channel
        .post(
            "#general",
            &SlackMessage {
                text: "deploy finished".into(),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_slack_channel_treats_ok_false_as_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": false, "error": "channel_not_found"})),
        )
        .mount(&server)
        .await;

    let channel = SlackChannel::with_base_url(&test_slack_settings(), server.uri());
    let err = channel
        .post("#general", &SlackMessage { text: "hi".into() })
        .await
        .unwrap_err();
    match err {
        DeliveryError::Api(reason) => assert_eq!(reason, "channel_not_found"),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_discord_happy_path_delivers_embed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .and(body_partial_json(json!({
            "content": "new release",
            "embeds": [{"title": "v1.2"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9"})))
        .expect(1)
        .mount(&server)
        .await;

    let channel = DiscordChannel::with_base_url(&test_discord_settings(), server.uri());
    let embed = Embed {
        title: Some("v1.2".into()),
        ..Embed::default()
    };

    assert!(channel.announce(Some("new release"), Some(&embed)).await);
}

#[tokio::test]
async fn test_discord_caches_resolved_channel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;
    // The channel lookup must only happen once across repeated announcements
    Mock::given(method("GET"))
        .and(path("/channels/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "42"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9"})))
        .expect(2)
        .mount(&server)
        .await;

    let channel = DiscordChannel::with_base_url(&test_discord_settings(), server.uri());
    assert!(channel.announce(Some("first"), None).await);
    assert!(channel.announce(Some("second"), None).await);
}

#[tokio::test]
async fn test_discord_rejected_token_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let channel = DiscordChannel::with_base_url(&test_discord_settings(), server.uri());
    assert!(!channel.announce(Some("hello"), None).await);
}

#[tokio::test]
async fn test_discord_missing_channel_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let channel = DiscordChannel::with_base_url(&test_discord_settings(), server.uri());
    assert!(!channel.announce(Some("hello"), None).await);
}

#[tokio::test]
async fn test_discord_forbidden_channel_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels/42"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let channel = DiscordChannel::with_base_url(&test_discord_settings(), server.uri());
    assert!(!channel.announce(Some("hello"), None).await);
}
