use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use tgb_core::{
    config::BotConfig,
    domain::{ChatId, MessageId, UserId},
    errors::Error,
    transport::Transport,
};
use tgb_telegram::{BotClient, HttpTransport};

const TOKEN: &str = "123:abc";

fn client_for(base: String) -> BotClient {
    let cfg = BotConfig::new(TOKEN, [ChatId(100)]).with_api_base(base);
    BotClient::from_config(&cfg).unwrap()
}

#[tokio::test]
async fn get_me_posts_to_token_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/bot123:abc/getMe");
            then.status(200)
                .json_body(json!({"ok": true, "result": {"id": 1, "first_name": "Bot"}}));
        })
        .await;

    let me = client_for(server.base_url()).get_me().await.unwrap();
    assert_eq!(me.id, UserId(1));
    assert_eq!(me.first_name, "Bot");
    mock.assert_async().await;
}

#[tokio::test]
async fn send_message_carries_json_params() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/bot123:abc/sendMessage")
                .json_body(json!({"chat_id": 100, "text": "ping"}));
            then.status(200).json_body(json!({
                "ok": true,
                "result": {
                    "message_id": 11,
                    "date": 1_700_000_000,
                    "chat": {"id": 100, "type": "group"},
                    "text": "ping"
                }
            }));
        })
        .await;

    let sent = client_for(server.base_url())
        .send_message(ChatId(100), "ping")
        .await
        .unwrap();
    assert_eq!(sent.message_id, MessageId(11));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_status_body_is_decoded_as_envelope() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/bot123:abc/getChatMember");
            then.status(400).json_body(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: user not found"
            }));
        })
        .await;

    let err = client_for(server.base_url())
        .get_chat_member(ChatId(100), UserId(5))
        .await
        .unwrap_err();
    match err {
        Error::Api {
            description,
            error_code,
            ..
        } => {
            assert_eq!(description, "Bad Request: user not found");
            assert_eq!(error_code, Some(400));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn raw_body_is_returned_unmodified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/raw");
            then.status(502).body("<html>bad gateway</html>");
        })
        .await;

    let transport = HttpTransport::new().unwrap();
    let body = transport
        .post_json(&format!("{}/raw", server.base_url()), Vec::new())
        .await
        .unwrap();
    assert_eq!(body, b"<html>bad gateway</html>".to_vec());
}

#[tokio::test]
async fn connection_failure_is_a_transport_error_without_token() {
    // Nothing listens on port 1.
    let err = client_for("http://127.0.0.1:1".to_string())
        .get_me()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(!err.to_string().contains(TOKEN));
}
