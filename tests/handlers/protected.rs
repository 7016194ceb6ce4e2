//! Authentication gate on protected routes.

use fittrack::services::jwt::{generate_jwt, generate_oauth_state};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::common::TestApp;

const PROTECTED_GETS: [&str; 9] = [
    "/api/profile",
    "/api/profile/status",
    "/api/meal-plans/2024-06-15",
    "/api/water-intake/2024-06-15",
    "/api/workouts/2024-06-15",
    "/api/dashboard/today-summary",
    "/api/external/food-nutrition?query=apple",
    "/api/google-calendar/status",
    "/api/admin/users",
];

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    for path in PROTECTED_GETS {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 401, "{}", path);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Not authorized, no token", "{}", path);
    }
}

#[tokio::test]
async fn test_garbage_bearer_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/profile"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::new().await;
    let token = generate_jwt(Uuid::new_v4(), app.config.jwt.secret.expose_secret(), -5).unwrap();

    let response = app
        .client
        .get(app.url("/api/dashboard/today-summary"))
        .header("cookie", format!("jwt={}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_oauth_state_token_cannot_be_used_as_session() {
    let app = TestApp::new().await;
    let token = generate_oauth_state(Uuid::new_v4(), app.config.jwt.secret.expose_secret()).unwrap();

    let response = app
        .client
        .get(app.url("/api/profile"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_oauth_callback_with_error_redirects_to_frontend() {
    let app = TestApp::new().await;

    let response = app
        .client
        .get(app.url("/api/google-calendar/oauth2callback?error=access_denied"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = response.headers().get("location").unwrap().to_str().unwrap();
    assert!(location.ends_with("/profile?google-auth=error"), "{}", location);
}
