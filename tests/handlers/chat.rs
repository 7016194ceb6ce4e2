//! Chat endpoint tests for guests. Member turns need a database and are
//! covered by the engine tests.

use serde_json::{json, Value};

use crate::common::TestApp;

async fn post_message(app: &TestApp, body: Value) -> reqwest::Response {
    app.client
        .post(app.url("/api/chat/message"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_guest_entry() {
    let app = TestApp::new().await;

    let response = post_message(&app, json!({ "currentState": null })).await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["newState"], "GUEST_WELCOME");
    assert_eq!(body["expectsUserInput"], false);
    assert_eq!(body["context"]["displayName"], "Guest");
    assert!(body.get("actionRequired").is_none());
    assert_eq!(body["options"][0]["text"], "What can FitTrack do?");
}

#[tokio::test]
async fn test_guest_follows_options() {
    let app = TestApp::new().await;

    let welcome: Value = post_message(&app, json!({})).await.json().await.unwrap();
    let response: Value = post_message(
        &app,
        json!({
            "currentState": welcome["newState"],
            "selectedOption": "How do I get started?",
            "context": welcome["context"],
        }),
    )
    .await
    .json()
    .await
    .unwrap();

    assert_eq!(response["newState"], "GUEST_GETTING_STARTED");
    assert_eq!(response["actionRequired"], "open_register");
}

#[tokio::test]
async fn test_guest_with_invalid_token_is_treated_as_guest() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/chat/message"))
        .bearer_auth("expired-or-forged")
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["newState"], "GUEST_WELCOME");
}

#[tokio::test]
async fn test_guest_cannot_jump_into_member_dialogue() {
    let app = TestApp::new().await;

    let response: Value = post_message(
        &app,
        json!({
            "currentState": "LOG_WATER_START",
            "userInput": "2",
            "context": { "displayName": "Admin" },
        }),
    )
    .await
    .json()
    .await
    .unwrap();

    assert_eq!(response["newState"], "GUEST_ERROR");
    assert_eq!(response["context"]["displayName"], "Guest");
    assert_eq!(response["options"][0]["text"], "Start Over");
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/chat/message"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
