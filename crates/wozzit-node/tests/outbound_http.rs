#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use wozzit_core::error::WozzitError;
use wozzit_core::Envelope;
use wozzit_node::client::WozzitClient;
use wozzit_node::config::SmtpConfig;
use wozzit_node::dispatch::{Adapters, Dispatcher, MatchCriteria};
use wozzit_node::outbound::{HttpTransport, LogNotifier, Mailer, SmtpMailer};
use wozzit_node::outbound::mailer::build_message;

use fakes::HookLog;

fn client(hooks: &HookLog) -> WozzitClient {
    WozzitClient::http(Duration::from_secs(5))
        .unwrap()
        .with_error_hook(hooks.hook())
}

#[tokio::test]
async fn send_posts_wire_envelope_and_parses_reply() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/").json_body(json!({
                "wozzit": {"protocol": [0, 0, 1], "schema": "com.example.ping", "version": 1, "payload": {"n": 1}}
            }));
            then.status(200).json_body(Envelope::receipt().to_value());
        })
        .await;

    let hooks = HookLog::default();
    let env = Envelope::with_schema("com.example.ping").with_payload(json!({"n": 1}));
    let reply = client(&hooks).send(&env, &server.url("/")).await.unwrap();

    assert_eq!(reply.schema, "wozzit.receipt");
    assert!(hooks.tags().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_reports_send() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(500).json_body(Envelope::internal_error().to_value());
        })
        .await;

    let hooks = HookLog::default();
    let err = client(&hooks).send(&Envelope::new(), &server.url("/")).await.unwrap_err();

    assert!(matches!(err, WozzitError::Status(500)), "{err}");
    assert_eq!(hooks.tags(), vec!["send"]);
}

#[tokio::test]
async fn garbage_reply_reports_invalidresponse() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).body("<html>nope</html>");
        })
        .await;

    let hooks = HookLog::default();
    let err = client(&hooks).send(&Envelope::new(), &server.url("/")).await.unwrap_err();

    assert!(matches!(err, WozzitError::InvalidResponse(_)), "{err}");
    assert_eq!(hooks.tags(), vec!["invalidresponse"]);
}

#[tokio::test]
async fn reply_that_fails_validation_is_invalid() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(json!({"wozzit": {"protocol": [0, 0, 1]}}));
        })
        .await;

    let hooks = HookLog::default();
    let err = client(&hooks).send(&Envelope::new(), &server.url("/")).await.unwrap_err();
    assert!(err.to_string().contains("No schema"), "{err}");
    assert_eq!(hooks.tags(), vec!["invalidresponse"]);
}

#[tokio::test]
async fn unreachable_node_reports_noserver() {
    let hooks = HookLog::default();
    let err = client(&hooks)
        .send(&Envelope::new(), "http://127.0.0.1:1/")
        .await
        .unwrap_err();

    assert!(matches!(err, WozzitError::NoServer(_)), "{err}");
    assert_eq!(hooks.tags(), vec!["noserver"]);
}

fn http_dispatcher(hooks: &HookLog) -> Dispatcher {
    let adapters = Adapters::new(
        Arc::new(HttpTransport::new(Duration::from_secs(5)).unwrap()),
        Arc::new(LogNotifier),
        Arc::new(SmtpMailer::new()),
    )
    .with_error_hook(hooks.hook());
    Dispatcher::new(adapters)
}

#[tokio::test]
async fn forward_rule_relays_to_peer() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/inbox").json_body(json!({
                "wozzit": {"protocol": [0, 0, 1], "schema": "com.example.alert", "version": 1}
            }));
            then.status(200).json_body(Envelope::receipt().to_value());
        })
        .await;

    let hooks = HookLog::default();
    let d = http_dispatcher(&hooks);
    d.add_forwarder(MatchCriteria::schema("com.example.alert"), server.url("/inbox"));

    let body = json!({"wozzit": {"protocol": [0, 0, 1], "schema": "com.example.alert", "version": 1, "psk": "k"}});
    let reply = d.process_value(&body, Some("10.0.0.3")).await;

    assert_eq!(reply.schema, "wozzit.receipt");
    assert!(hooks.tags().is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_forward_reports_forward_tag() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(503);
        })
        .await;

    let hooks = HookLog::default();
    let d = http_dispatcher(&hooks);
    d.add_forwarder(MatchCriteria::any(), server.url("/"));
    d.add_log(MatchCriteria::any());

    let reply = d.process_value(&Envelope::new().to_value(), None).await;

    assert_eq!(reply.schema, "wozzit.receipt");
    let entries = hooks.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "forward");
    assert!(entries[0].1.contains("503"), "{entries:?}");
}

#[tokio::test]
async fn email_without_smtp_host_is_reported() {
    let hooks = HookLog::default();
    let d = http_dispatcher(&hooks);
    d.add_email(
        MatchCriteria::any(),
        wozzit_node::dispatch::EmailAction {
            to_name: "Ops".into(),
            to_email: "ops@example.com".into(),
            subject: "s".into(),
            body: "b".into(),
        },
    );

    let reply = d.process_value(&Envelope::new().to_value(), None).await;

    assert_eq!(reply.schema, "wozzit.receipt");
    assert_eq!(hooks.entries(), vec![("email".to_string(), "smtp not configured".to_string())]);
}

#[tokio::test]
async fn smtp_mailer_requires_host() {
    let err = SmtpMailer::new()
        .send(&SmtpConfig::default(), "Ops", "ops@example.com", "s", "b")
        .await
        .unwrap_err();
    assert!(matches!(err, WozzitError::SmtpNotConfigured));
}

#[test]
fn email_message_headers() {
    let smtp = SmtpConfig {
        host: Some("mail.example.com".into()),
        from_name: Some("Node".into()),
        from_email: Some("node@example.com".into()),
        ..SmtpConfig::default()
    };
    let msg = build_message(&smtp, "Ops", "ops@example.com", "Disk full", "sda is at 99%").unwrap();
    let text = String::from_utf8(msg.formatted()).unwrap();

    assert!(text.contains("From: Node <node@example.com>"), "{text}");
    assert!(text.contains("To: Ops <ops@example.com>"), "{text}");
    assert!(text.contains("Subject: Disk full"), "{text}");
    assert!(text.contains("sda is at 99%"), "{text}");

    let bad = build_message(&smtp, "Ops", "not-an-address", "s", "b").unwrap_err();
    assert!(matches!(bad, WozzitError::Mail(_)));
}
