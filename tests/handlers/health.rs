//! Health endpoint tests

use crate::common::TestApp;

#[tokio::test]
async fn test_public_health_returns_status_ok() {
    let app = TestApp::new().await;

    let response = app.client.get(app.url("/api/health")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend_with_credentials() {
    let app = TestApp::new().await;
    let frontend = app.config.server.frontend_url.clone();

    let response = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/chat/message"))
        .header("Origin", &frontend)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap().to_str().unwrap(),
        frontend
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap().to_str().unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = TestApp::new().await;
    let response = app.client.get(app.url("/api/nope")).send().await.unwrap();
    assert_eq!(response.status(), 404);
}
