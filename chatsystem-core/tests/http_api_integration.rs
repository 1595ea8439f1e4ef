//! Integration tests for the HTTP API
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`,
//! following the same flows an external HTTP client would.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chatsystem_core::http_api::{build_router, AppState};
use chatsystem_core::ChatService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let service = Arc::new(ChatService::default());
    build_router(Arc::new(AppState::new(service, 64 * 1024)))
}

fn fresh_id() -> String {
    format!("C-{}", uuid::Uuid::new_v4().simple())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_channel(app: &Router, id: &str, topic: &str, owner: &str) {
    let (status, body) = send(
        app,
        Method::PUT,
        "/channels",
        Some(json!({"id": id, "topic": topic, "owner": owner})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], id);
}

async fn post_message(app: &Router, id: &str, author: &str, text: &str) -> Value {
    let (status, body) = send(
        app,
        Method::PUT,
        &format!("/channels/{}/messages", id),
        Some(json!({"author": author, "text": text})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn get_messages(app: &Router, uri: &str) -> Vec<Value> {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().cloned().unwrap()
}

async fn delete_channel(app: &Router, id: &str) {
    let (status, body) = send(app, Method::DELETE, &format!("/channels/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

fn texts(messages: &[Value]) -> Vec<&str> {
    messages.iter().map(|m| m["text"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_creating_channel() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "Things", "owner1").await;

    let (status, channel) = send(&app, Method::GET, &format!("/channels/{}", cid), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(channel["id"], cid.as_str());
    assert_eq!(channel["topic"], "Things");
    assert_eq!(channel["owner"], "owner1");
    assert!(channel["createdAt"].as_str().unwrap().ends_with('Z'));

    delete_channel(&app, &cid).await;

    let (status, body) = send(&app, Method::GET, &format!("/channels/{}", cid), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_posting_messages() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "Channel 1", "owner1").await;

    let posted = post_message(&app, &cid, "author1", "Message 1").await;
    assert_eq!(posted["author"], "author1");
    assert!(posted["timestamp"].is_string());
    post_message(&app, &cid, "author2", "Message 2").await;

    let messages = get_messages(&app, &format!("/channels/{}/messages", cid)).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["author"], "author1");
    assert_eq!(messages[0]["text"], "Message 1");
    assert_eq!(messages[1]["author"], "author2");
    assert_eq!(messages[1]["text"], "Message 2");

    delete_channel(&app, &cid).await;
}

#[tokio::test]
async fn test_getting_messages() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "Channel 1", "owner1").await;

    post_message(&app, &cid, "author1", "Message 1").await;
    post_message(&app, &cid, "author2", "Message 2").await;
    post_message(&app, &cid, "author1", "Message 3").await;
    post_message(&app, &cid, "author2", "Message 4").await;
    post_message(&app, &cid, "author1", "Message 5").await;

    let base = format!("/channels/{}/messages", cid);
    let messages = get_messages(&app, &base).await;
    assert_eq!(messages.len(), 5);

    let third_message_time = messages[2]["timestamp"].as_str().unwrap().to_string();

    let messages_at = get_messages(&app, &format!("{}?startAt={}", base, third_message_time)).await;
    assert_eq!(texts(&messages_at), vec!["Message 3", "Message 4", "Message 5"]);
    assert_eq!(messages_at[1]["author"], "author2");

    let messages_by = get_messages(&app, &format!("{}?author=author1", base)).await;
    assert_eq!(texts(&messages_by), vec!["Message 1", "Message 3", "Message 5"]);

    let messages_by_at = get_messages(
        &app,
        &format!("{}?author=author1&startAt={}", base, third_message_time),
    )
    .await;
    assert_eq!(texts(&messages_by_at), vec!["Message 3", "Message 5"]);
    for m in &messages_by_at {
        assert_eq!(m["author"], "author1");
    }

    delete_channel(&app, &cid).await;
}

#[tokio::test]
async fn test_membership() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "Channel 1", "owner1").await;
    let members_uri = format!("/channels/{}/members", cid);

    for member in ["member1", "member2", "member1"] {
        let (status, body) =
            send(&app, Method::PUT, &members_uri, Some(json!({"member": member}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Member added.");
    }

    let (status, members) = send(&app, Method::GET, &members_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 3);
    for expected in ["owner1", "member1", "member2"] {
        assert!(members.contains(&json!(expected)));
    }

    let member1_uri = format!("{}/member1", members_uri);
    let (status, _) = send(&app, Method::DELETE, &member1_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, members) = send(&app, Method::GET, &members_uri, None).await;
    let members = members.as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.contains(&json!("owner1")));
    assert!(!members.contains(&json!("member1")));
    assert!(members.contains(&json!("member2")));

    let (status, body) = send(&app, Method::DELETE, &member1_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    delete_channel(&app, &cid).await;
}

#[tokio::test]
async fn test_duplicate_channel_is_conflict() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "first", "owner1").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/channels",
        Some(json!({"id": cid, "topic": "second", "owner": "owner2"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_exists");

    let (_, channel) = send(&app, Method::GET, &format!("/channels/{}", cid), None).await;
    assert_eq!(channel["topic"], "first");
}

#[tokio::test]
async fn test_missing_topic_defaults_to_empty() {
    let app = app();
    let cid = fresh_id();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/channels",
        Some(json!({"id": cid, "owner": "owner1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, channel) = send(&app, Method::GET, &format!("/channels/{}", cid), None).await;
    assert_eq!(channel["topic"], "");
}

#[tokio::test]
async fn test_input_validation() {
    let app = app();
    let cid = fresh_id();

    let blank_id = json!({"id": " ", "owner": "o"});
    let (status, body) = send(&app, Method::PUT, "/channels", Some(blank_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid input, missing id or owner.");

    let (status, _) = send(&app, Method::PUT, "/channels", Some(json!({"id": cid}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create_channel(&app, &cid, "t", "owner1").await;
    let messages_uri = format!("/channels/{}/messages", cid);

    let missing_text = json!({"author": "a"});
    let (status, _) = send(&app, Method::PUT, &messages_uri, Some(missing_text)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let blank_author = json!({"author": "", "text": "x"});
    let (status, _) = send(&app, Method::PUT, &messages_uri, Some(blank_author)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/channels/{}/members", cid),
        Some(json!({"member": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_start = format!("{}?startAt=yesterday", messages_uri);
    let (status, body) = send(&app, Method::GET, &bad_start, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/channels")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_operations_on_missing_channel_are_not_found() {
    let app = app();
    let cid = fresh_id();

    let checks = [
        (Method::GET, format!("/channels/{}", cid), None),
        (Method::DELETE, format!("/channels/{}", cid), None),
        (
            Method::PUT,
            format!("/channels/{}/messages", cid),
            Some(json!({"author": "a", "text": "t"})),
        ),
        (Method::GET, format!("/channels/{}/messages", cid), None),
        (
            Method::PUT,
            format!("/channels/{}/members", cid),
            Some(json!({"member": "m"})),
        ),
        (Method::GET, format!("/channels/{}/members", cid), None),
        (Method::DELETE, format!("/channels/{}/members/m", cid), None),
    ];

    for (method, uri, body) in checks {
        let (status, _) = send(&app, method.clone(), &uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_deleted_channel_history_is_gone() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "t", "owner1").await;
    post_message(&app, &cid, "a", "hello").await;
    assert_eq!(get_messages(&app, &format!("/channels/{}/messages", cid)).await.len(), 1);

    delete_channel(&app, &cid).await;

    let (status, _) = send(&app, Method::GET, &format!("/channels/{}/messages", cid), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create_channel(&app, &cid, "t", "owner1").await;
    assert!(get_messages(&app, &format!("/channels/{}/messages", cid)).await.is_empty());
}

#[tokio::test]
async fn test_start_at_accepts_epoch_millis() {
    let app = app();
    let cid = fresh_id();
    create_channel(&app, &cid, "t", "owner1").await;
    post_message(&app, &cid, "a", "one").await;

    let messages = get_messages(&app, &format!("/channels/{}/messages?startAt=0", cid)).await;
    assert_eq!(texts(&messages), vec!["one"]);

    let far_future = format!("/channels/{}/messages?startAt=32503680000000", cid);
    assert!(get_messages(&app, &far_future).await.is_empty());
}

#[tokio::test]
async fn test_health() {
    let app = app();
    create_channel(&app, &fresh_id(), "t", "owner1").await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["channels"], 1);
}
