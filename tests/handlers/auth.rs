use crate::common::{generate_test_email, TestApp};

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "name": "Alex",
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "name": "Alex",
            "email": generate_test_email(),
            "password": "short"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_register_rejects_blank_name() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "name": "   ",
            "email": generate_test_email(),
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_register_rejects_malformed_json() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_login_with_empty_credentials_returns_401() {
    let app = TestApp::new().await;

    let response = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": "", "password": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;

    let response = app.client.post(app.url("/api/auth/logout")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("jwt=;"));
    assert!(cookie.contains("Max-Age=0"));
}
